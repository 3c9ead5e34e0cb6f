/// Incident report example: one record mapped to a sequence of session
/// calls, the way a calling service would.
///
/// Run with:
///   cargo run --example incident_report -p report-demos
///
/// Writes output to: demos/output/incident-report.pdf
use report_core::{ChecklistItem, KeyValue, Session, SignatureParty, StatusColour};

struct Incident {
    id: &'static str,
    severity: &'static str,
    occurred: &'static str,
    location: &'static str,
    reporter: &'static str,
    injured: &'static str,
    description: &'static str,
    injury: &'static str,
    witnesses: &'static [(&'static str, &'static str, &'static str)],
    actions: &'static [&'static str],
}

const INCIDENT: Incident = Incident {
    id: "9c41e7b2-55aa-4f0e-a1d3-2b7c8e6f0d91",
    severity: "Major",
    occurred: "14/10/2026 10:42",
    location: "Plant room B, Level 2, Riverside Works",
    reporter: "Amira Patel",
    injured: "Tom Walsh (apprentice)",
    description: "While replacing a lighting circuit in the plant room the apprentice received \
        a shock from a borrowed neutral shared with an adjacent circuit that had not been \
        isolated. The supervisor isolated the distribution board, administered first aid \
        and reported the incident to site management.\n\
        The circuit was locked off and tagged pending investigation.",
    injury: "Minor burn to the right index finger. Assessed by the site first aider; no \
        hospital visit required. Returned to light duties the same afternoon.",
    witnesses: &[
        ("Ben Jones", "Elec-Mate", "07700 900123"),
        ("Chloe Lee", "Riverside Build Ltd", "07700 900456"),
    ],
    actions: &[
        "Trace and relabel all shared neutrals at DB-2",
        "Toolbox talk on borrowed neutrals for all operatives on site",
        "Review the isolation procedure with the apprentice and supervisor",
    ],
};

fn severity_colour(severity: &str) -> StatusColour {
    match severity {
        "Major" | "Critical" => StatusColour::Danger,
        "Moderate" => StatusColour::Warning,
        _ => StatusColour::Info,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let r = &INCIDENT;
    let mut doc = Session::create(
        "Accident / Incident Record",
        r.id,
        r.severity,
        severity_colour(r.severity),
    )
    .await?;

    doc.warning_banner("Area isolated pending investigation")?;

    doc.section("Incident details")?;
    doc.key_value_grid(
        &[
            KeyValue::new("Date and time", r.occurred),
            KeyValue::new("Severity", r.severity),
            KeyValue::new("Location", r.location),
            KeyValue::new("Reported by", r.reporter),
            KeyValue::new("Person involved", r.injured),
        ],
        2,
    )?;

    doc.section("What happened")?;
    doc.paragraph(r.description)?;
    doc.spacer(8.0)?;
    doc.text_box(r.injury, StatusColour::Warning)?;

    doc.section("Witnesses")?;
    let rows: Vec<Vec<String>> = r
        .witnesses
        .iter()
        .map(|(name, company, phone)| vec![name.to_string(), company.to_string(), phone.to_string()])
        .collect();
    doc.table(&["Name", "Company", "Contact"], &rows, None)?;

    doc.section("Immediate checks")?;
    doc.checklist(&[
        ChecklistItem::new("Circuit isolated and locked off", true),
        ChecklistItem::new("First aid administered", true),
        ChecklistItem::new("Shared neutrals identified", false).with_notes("Labelling missing at DB-2"),
    ])?;
    doc.badges(&["RIDDOR review", "Toolbox talk", "Procedure review"], StatusColour::Info)?;

    doc.section("Follow-up actions")?;
    doc.bullet_list(r.actions)?;
    doc.labelled_value("Follow-up due", "21/10/2026")?;

    doc.section("Sign-off")?;
    doc.signature_block(&[
        SignatureParty::new("Reported by").name(r.reporter).date("14/10/2026"),
        SignatureParty::new("Site supervisor"),
        SignatureParty::new("Client representative"),
    ])?;
    doc.footnote(
        "This record must be retained for at least three years. Reportable incidents must \
         also be notified to the enforcing authority.",
    )?;

    let pages = doc.page_count();
    let bytes = doc.finalize().await?;

    tokio::fs::create_dir_all("demos/output").await?;
    let path = "demos/output/incident-report.pdf";
    tokio::fs::write(path, &bytes).await?;
    println!("Written {} ({} pages, {} bytes)", path, pages, bytes.len());
    Ok(())
}

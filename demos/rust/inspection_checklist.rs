/// Long inspection checklist: spills over several pages, repeating the
/// header and footer and the table header on each.
///
/// An optional JSON config path changes branding, geometry or fonts:
///   cargo run --example inspection_checklist -p report-demos -- config.json
///
/// Writes output to: demos/output/inspection-checklist.pdf
use report_core::{
    ChecklistItem, DocumentMeta, KeyValue, PdfBackend, Session, SessionConfig, StatusColour,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_json(&tokio::fs::read_to_string(&path).await?)?,
        None => SessionConfig::default(),
    };
    let meta = DocumentMeta::new(
        "Electrical Installation Condition Report",
        "eicr-20261018-0042",
        "Satisfactory",
        StatusColour::Success,
    );
    let mut doc = Session::create_with(PdfBackend::new()?, config, meta).await?;

    doc.section("Installation")?;
    doc.key_value_grid(
        &[
            KeyValue::new("Client", "Riverside Build Ltd"),
            KeyValue::new("Address", "Unit 4, Riverside Works, Leeds"),
            KeyValue::new("Supply", "TN-C-S, 230 V, 100 A"),
            KeyValue::new("Inspector", "Amira Patel"),
            KeyValue::new("Boards", "DB-1, DB-2, DB-3"),
            KeyValue::new("Next inspection", "October 2031"),
        ],
        3,
    )?;

    doc.section("Circuit schedule")?;
    let rows: Vec<Vec<String>> = (1..=36)
        .map(|n| {
            vec![
                format!("DB-{}/{}", 1 + (n - 1) / 12, n),
                match n % 4 {
                    0 => "Sockets".to_string(),
                    1 => "Lighting".to_string(),
                    2 => "Radial 20A".to_string(),
                    _ => "Extract fan".to_string(),
                },
                format!("{:.2}", 0.18 + n as f64 * 0.03),
                format!(">{}", 200 + n * 5),
                if n % 9 == 0 { "C3".to_string() } else { "OK".to_string() },
            ]
        })
        .collect();
    doc.table(&["Circuit", "Description", "Zs (ohms)", "IR (Mohms)", "Result"], &rows, None)?;

    doc.section("Inspection checklist")?;
    let items: Vec<ChecklistItem> = (1..=40)
        .map(|n| {
            let item = ChecklistItem::new(format!("Schedule item 4.{}: visual inspection", n), n % 13 != 0);
            if n % 13 == 0 {
                item.with_notes("Observation recorded, see schedule of findings")
            } else {
                item
            }
        })
        .collect();
    doc.checklist(&items)?;

    doc.page_break()?;
    doc.section("Summary")?;
    doc.text_box(
        "The installation is in a satisfactory condition for continued use. Two C3 \
         observations are recorded for improvement.",
        StatusColour::Success,
    )?;

    let pages = doc.page_count();
    let bytes = doc.finalize().await?;

    tokio::fs::create_dir_all("demos/output").await?;
    let path = "demos/output/inspection-checklist.pdf";
    tokio::fs::write(path, &bytes).await?;
    println!("Written {} ({} pages, {} bytes)", path, pages, bytes.len());
    Ok(())
}

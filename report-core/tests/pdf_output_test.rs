use report_core::{
    ChecklistItem, DocumentMeta, KeyValue, PdfBackend, Session, SessionConfig, SignatureParty,
    StatusColour,
};

/// Helper: check that a byte pattern exists in the buffer.
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[tokio::test]
async fn incident_report_is_a_pdf() {
    let mut s = Session::create(
        "Accident / Incident Record",
        "5f3c9a10-7d2e-4b1a",
        "Major",
        StatusColour::Danger,
    )
    .await
    .unwrap();

    s.section("Incident details").unwrap();
    s.key_value_grid(
        &[
            KeyValue::new("Date", "14/10/2026"),
            KeyValue::new("Time", "10:42"),
            KeyValue::new("Location", "Plant room B, Level 2"),
            KeyValue::new("Reported by", "A. Patel"),
            KeyValue::new("Person involved", "T. Walsh"),
            KeyValue::new("Severity", "Major"),
        ],
        2,
    )
    .unwrap();
    s.warning_banner("Area isolated pending investigation").unwrap();
    s.section("Description").unwrap();
    s.paragraph(
        "While replacing a lighting circuit the operative received a minor shock from a \
         borrowed neutral. First aid was given on site and the circuit was locked off.",
    )
    .unwrap();
    s.text_box("Injury: minor burn to right hand. No hospital visit required.", StatusColour::Warning)
        .unwrap();
    s.section("Witnesses").unwrap();
    s.table(
        &["Name", "Company", "Contact"],
        &[
            vec!["B. Jones", "Elec-Mate", "07700 900123"],
            vec!["C. Lee", "Main contractor", "07700 900456"],
        ],
        None,
    )
    .unwrap();
    s.section("Checks").unwrap();
    s.checklist(&[
        ChecklistItem::new("Circuit isolated and locked off", true),
        ChecklistItem::new("Shared neutral identified", false).with_notes("Labelling missing at DB-2"),
    ])
    .unwrap();
    s.badges(&["RIDDOR review", "Toolbox talk"], StatusColour::Info).unwrap();
    s.bullet_list(&["Relabel DB-2 neutrals", "Brief all operatives"]).unwrap();
    s.signature_block(&[
        SignatureParty::new("Reported by").name("A. Patel").date("14/10/2026"),
        SignatureParty::new("Supervisor"),
    ])
    .unwrap();
    s.labelled_value("Follow-up due", "21/10/2026").unwrap();
    s.footnote("This record must be retained for at least three years.").unwrap();

    let bytes = s.finalize().await.unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert!(contains(&bytes, b"/Title (Accident / Incident Record)"));
    assert!(contains(&bytes, b"(ELEC-MATE) Tj"));
    assert!(contains(&bytes, b"(ACCIDENT / INCIDENT RECORD) Tj"));
    assert!(contains(&bytes, b"(REF: 5F3C9A10) Tj"));
    assert!(contains(&bytes, b"(Page 1) Tj"));
    assert!(contains(&bytes, b"(T. Walsh) Tj"));
}

#[tokio::test]
async fn every_page_is_in_the_pages_tree() {
    let mut s = Session::create("Test Sheet", "ref", "Pass", StatusColour::Success)
        .await
        .unwrap();
    let items: Vec<ChecklistItem> = (1..=40)
        .map(|i| ChecklistItem::new(format!("Circuit {} insulation resistance", i), true))
        .collect();
    s.checklist(&items).unwrap();
    let pages = s.page_count();
    let bytes = s.finalize().await.unwrap();

    assert!(pages >= 2);
    assert!(contains(&bytes, format!("/Count {}", pages).as_bytes()));
    assert_eq!(occurrences(&bytes, b"/Type /Page "), pages as usize);
    for n in 1..=pages {
        assert!(contains(&bytes, format!("(Page {}) Tj", n).as_bytes()));
    }
}

#[tokio::test]
async fn config_changes_branding() {
    let config = SessionConfig::from_json(r#"{ "brand": { "name": "SPARKS LTD", "caption": "Sparks Ltd" } }"#)
        .unwrap();
    let meta = DocumentMeta::new("Permit", "p-1", "Open", StatusColour::Grey);
    let s = Session::create_with(PdfBackend::new().unwrap(), config, meta)
        .await
        .unwrap();
    let bytes = s.finalize().await.unwrap();
    assert!(contains(&bytes, b"(SPARKS LTD) Tj"));
    assert!(contains(&bytes, b"(Sparks Ltd) Tj"));
    assert!(contains(&bytes, b"/Creator (SPARKS LTD)"));
}

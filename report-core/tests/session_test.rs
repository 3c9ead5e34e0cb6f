use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use report_core::{
    BuiltinFont, ChecklistItem, DocumentMeta, DrawOp, DrawingBackend, FontFace, KeyValue,
    LoadedFont, PageGeometry, Result, Session, SessionConfig, SignatureParty, StatusColour,
    TextMeasure,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Font(FontFace),
    Info(String, String),
    Begin,
    Op(DrawOp),
    End,
}

/// Records every call; measures with the builtin Helvetica metrics.
struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    fn new() -> (Self, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Recorder {
                events: Arc::clone(&events),
            },
            events,
        )
    }

    fn push(&self, e: Event) {
        self.events.lock().unwrap().push(e);
    }
}

impl TextMeasure for Recorder {
    fn text_width(&self, text: &str, face: FontFace, size: f64) -> f64 {
        BuiltinFont::for_face(face).measure(text, size)
    }
}

impl DrawingBackend for Recorder {
    fn embed_font(&mut self, face: FontFace, _font: LoadedFont) -> Result<()> {
        self.push(Event::Font(face));
        Ok(())
    }

    fn set_info(&mut self, key: &str, value: &str) {
        self.push(Event::Info(key.to_string(), value.to_string()));
    }

    fn begin_page(&mut self, _width: f64, _height: f64) -> Result<()> {
        self.push(Event::Begin);
        Ok(())
    }

    fn draw(&mut self, op: &DrawOp) -> Result<()> {
        self.push(Event::Op(op.clone()));
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        self.push(Event::End);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(b"recorded".to_vec())
    }
}

/// 600x800 page, content area 730 down to 50 (680 tall).
fn geometry() -> PageGeometry {
    PageGeometry {
        page_width: 600.0,
        page_height: 800.0,
        margin_left: 50.0,
        margin_right: 50.0,
        header_height: 60.0,
        footer_height: 40.0,
        gap: 10.0,
    }
}

fn meta() -> DocumentMeta {
    let at = NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(8, 15, 30)
        .unwrap();
    DocumentMeta::new("Inspection Report", "a1b2c3d4e5f6", "pass", StatusColour::Success).issued_at(at)
}

async fn session_with(geometry: PageGeometry) -> (Session<Recorder>, Arc<Mutex<Vec<Event>>>) {
    let (backend, events) = Recorder::new();
    let config = SessionConfig {
        geometry,
        ..SessionConfig::default()
    };
    let session = Session::create_with(backend, config, meta()).await.unwrap();
    (session, events)
}

/// Draw operations grouped by page.
fn pages(events: &[Event]) -> Vec<Vec<DrawOp>> {
    let mut out = Vec::new();
    for e in events {
        match e {
            Event::Begin => out.push(Vec::new()),
            Event::Op(op) => out.last_mut().expect("op outside page").push(op.clone()),
            _ => {}
        }
    }
    out
}

fn texts(ops: &[DrawOp]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn count(events: &[Event], wanted: &Event) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

#[tokio::test]
async fn create_embeds_fonts_and_writes_info() {
    let (session, events) = session_with(geometry()).await;
    drop(session);
    let events = events.lock().unwrap().clone();
    assert_eq!(events[0], Event::Font(FontFace::Regular));
    assert_eq!(events[1], Event::Font(FontFace::Bold));
    assert!(events.contains(&Event::Info("Title".into(), "Inspection Report".into())));
    assert!(events.contains(&Event::Info("CreationDate".into(), "D:20261018081530".into())));
    assert!(events.contains(&Event::Info("Creator".into(), "ELEC-MATE".into())));
    assert_eq!(count(&events, &Event::Begin), 1);
}

#[tokio::test]
async fn exact_fill_stays_on_one_page() {
    let (mut s, events) = session_with(geometry()).await;
    // 20 x 30 + 5 x 16 = 680
    for i in 0..20 {
        s.section(&format!("Section {}", i)).unwrap();
    }
    for i in 0..5 {
        s.labelled_value("Item", &i.to_string()).unwrap();
    }
    assert_eq!(s.page_count(), 1);
    assert!((s.cursor_y() - 50.0).abs() < 1e-6);
    s.finalize().await.unwrap();
    assert_eq!(count(&events.lock().unwrap(), &Event::Begin), 1);
}

#[tokio::test]
async fn one_more_block_starts_a_second_page() {
    let (mut s, events) = session_with(geometry()).await;
    s.spacer(340.0).unwrap();
    s.spacer(340.0).unwrap();
    s.labelled_value("Overflow", "yes").unwrap();
    assert_eq!(s.page_count(), 2);
    s.finalize().await.unwrap();

    let events = events.lock().unwrap().clone();
    assert_eq!(count(&events, &Event::Begin), 2);
    assert_eq!(count(&events, &Event::End), 2);
    let p = pages(&events);
    assert!(texts(&p[1]).contains(&"Overflow:".to_string()));
    assert!(!texts(&p[0]).contains(&"Overflow:".to_string()));
}

#[tokio::test]
async fn footers_number_pages_in_order() {
    let (mut s, events) = session_with(geometry()).await;
    for _ in 0..4 {
        s.paragraph("Some text before a break.").unwrap();
        s.page_break().unwrap();
    }
    s.paragraph("Last page.").unwrap();
    s.finalize().await.unwrap();

    let events = events.lock().unwrap().clone();
    let numbers: Vec<String> = pages(&events)
        .iter()
        .flat_map(|ops| texts(ops))
        .filter(|t| t.starts_with("Page "))
        .collect();
    assert_eq!(numbers, vec!["Page 1", "Page 2", "Page 3", "Page 4", "Page 5"]);
}

#[tokio::test]
async fn long_checklist_repeats_identical_chrome() {
    let (mut s, events) = session_with(PageGeometry::A4).await;
    s.section("Pre-work checks").unwrap();
    let items: Vec<ChecklistItem> = (0..40)
        .map(|i| ChecklistItem::new(format!("Check {}", i + 1), i % 7 != 3))
        .collect();
    s.checklist(&items).unwrap();
    let page_count = s.page_count();
    s.finalize().await.unwrap();
    assert!(page_count >= 2);

    let g = PageGeometry::A4;
    let chrome = |ops: &[DrawOp]| -> Vec<DrawOp> {
        ops.iter()
            .filter(|op| match op {
                DrawOp::Text { y, .. } => *y > g.content_top() || *y < g.content_bottom(),
                _ => false,
            })
            .filter(|op| !matches!(op, DrawOp::Text { text, .. } if text.starts_with("Page ")))
            .cloned()
            .collect()
    };
    let p = pages(&events.lock().unwrap());
    assert_eq!(p.len() as u32, page_count);
    let first = chrome(&p[0]);
    assert!(texts(&first).contains(&"REF: A1B2C3D4".to_string()));
    assert!(texts(&first).contains(&"INSPECTION REPORT".to_string()));
    assert!(texts(&first).contains(&"Generated 18 Oct 2026 08:15".to_string()));
    for page in &p[1..] {
        assert_eq!(chrome(page), first);
    }
}

#[tokio::test]
async fn checklist_rows_show_verdict_and_notes() {
    let (mut s, events) = session_with(geometry()).await;
    let start = s.cursor_y();
    s.checklist(&[ChecklistItem::new("Isolation verified", true)]).unwrap();
    let plain = start - s.cursor_y();
    let before = s.cursor_y();
    s.checklist(&[ChecklistItem::new("Barriers in place", false).with_notes("Missing on east side")])
        .unwrap();
    let noted = before - s.cursor_y();
    assert_eq!(plain, 22.0);
    assert_eq!(noted, 34.0);
    s.finalize().await.unwrap();

    let all = texts(&pages(&events.lock().unwrap())[0]);
    assert!(all.contains(&"PASS".to_string()));
    assert!(all.contains(&"FAIL".to_string()));
    assert!(all.contains(&"Missing on east side".to_string()));
}

#[tokio::test]
async fn empty_table_shows_placeholder() {
    let (mut s, events) = session_with(geometry()).await;
    let rows: Vec<Vec<&str>> = Vec::new();
    s.table(&["Name", "Role"], &rows, None).unwrap();
    assert_eq!(s.cursor_y(), 730.0 - 22.0 - 20.0);
    s.finalize().await.unwrap();
    let all = texts(&pages(&events.lock().unwrap())[0]);
    assert!(all.contains(&"No records".to_string()));
}

#[tokio::test]
async fn table_rows_alternate_backgrounds() {
    let (mut s, events) = session_with(geometry()).await;
    let rows: Vec<Vec<String>> = (0..5)
        .map(|i| vec![format!("Worker {}", i), "Electrician".to_string()])
        .collect();
    s.table(&["Name", "Trade"], &rows, Some(&[300.0, 200.0][..])).unwrap();
    s.finalize().await.unwrap();

    let zebra = report_core::color::ZEBRA;
    let striped = pages(&events.lock().unwrap())[0]
        .iter()
        .filter(|op| matches!(op, DrawOp::Rect { fill: Some(c), .. } if *c == zebra))
        .count();
    // rows 0, 2 and 4
    assert_eq!(striped, 3);
}

#[tokio::test]
async fn wide_column_widths_are_scaled_to_content_width() {
    let (mut s, events) = session_with(geometry()).await;
    let rows = vec![vec!["Worker", "Electrician"]];
    s.table(&["Name", "Trade"], &rows, Some(&[400.0, 400.0][..])).unwrap();
    s.finalize().await.unwrap();

    let p = pages(&events.lock().unwrap());
    let x_of = |wanted: &str| {
        p[0].iter()
            .find_map(|op| match op {
                DrawOp::Text { text, x, .. } if text == wanted => Some(*x),
                _ => None,
            })
            .unwrap()
    };
    // 800 of widths into 500 of content: each column becomes 250
    assert_eq!(x_of("Trade"), 50.0 + 250.0 + 5.0);
    assert_eq!(x_of("Electrician"), 50.0 + 250.0 + 5.0);
}

#[tokio::test]
async fn owned_and_borrowed_strings_are_accepted() {
    let (mut s, events) = session_with(geometry()).await;
    let headers = vec!["Name".to_string(), "Trade".to_string()];
    let rows = vec![vec![String::from("Worker"), String::from("Electrician")]];
    s.table(&headers, &rows, None).unwrap();
    let labels: Vec<String> = vec!["Hot works".into()];
    s.badges(&labels, StatusColour::Danger).unwrap();
    let items = ["Permit signed".to_string()];
    s.bullet_list(&items).unwrap();
    s.finalize().await.unwrap();

    let all = texts(&pages(&events.lock().unwrap())[0]);
    for wanted in ["Trade", "Electrician", "Hot works", "Permit signed"] {
        assert!(all.contains(&wanted.to_string()), "missing {}", wanted);
    }
}

#[tokio::test]
async fn grid_rows_move_whole_to_next_page() {
    let (mut s, _events) = session_with(geometry()).await;
    s.spacer(680.0 - 45.0).unwrap();
    let pairs: Vec<KeyValue> = (0..4).map(|i| KeyValue::new(format!("Key {}", i), "Value")).collect();
    s.key_value_grid(&pairs, 2).unwrap();
    // first row fits in the 45 left, second row goes to page 2
    assert_eq!(s.page_count(), 2);
    assert_eq!(s.cursor_y(), 730.0 - 30.0);
}

#[tokio::test]
async fn text_box_is_never_split() {
    let (mut s, events) = session_with(geometry()).await;
    s.spacer(600.0).unwrap();
    let text = "Line of text inside the box.\n".repeat(6);
    s.text_box(text.trim_end(), StatusColour::Warning).unwrap();
    assert_eq!(s.page_count(), 2);
    s.finalize().await.unwrap();
    let p = pages(&events.lock().unwrap());
    let on_first = texts(&p[0]).iter().filter(|t| t.starts_with("Line of text")).count();
    let on_second = texts(&p[1]).iter().filter(|t| t.starts_with("Line of text")).count();
    assert_eq!((on_first, on_second), (0, 6));
}

#[tokio::test]
async fn paragraph_breaks_between_lines() {
    let (mut s, events) = session_with(geometry()).await;
    s.spacer(680.0 - 30.0).unwrap();
    // three lines of 9.5 * 1.55 = 14.725 each; two fit in 30
    s.paragraph("first\nsecond\nthird").unwrap();
    assert_eq!(s.page_count(), 2);
    s.finalize().await.unwrap();
    let p = pages(&events.lock().unwrap());
    assert!(texts(&p[0]).contains(&"second".to_string()));
    assert!(texts(&p[1]).contains(&"third".to_string()));
}

#[tokio::test]
async fn bullets_signatures_and_badges_render() {
    let (mut s, events) = session_with(geometry()).await;
    s.bullet_list(&["Wear PPE", "Test before touch"]).unwrap();
    s.badges(&["Working at height", "Live work"], StatusColour::Warning).unwrap();
    s.signature_block(&[
        SignatureParty::new("Supervisor").name("J. Smith"),
        SignatureParty::new("Operative"),
        SignatureParty::new("Client"),
    ])
    .unwrap();
    s.warning_banner("Do not energise").unwrap();
    s.footnote("Records are retained for six years.").unwrap();
    s.finalize().await.unwrap();

    let all: Vec<String> = pages(&events.lock().unwrap()).iter().flat_map(|p| texts(p)).collect();
    for expected in [
        "Wear PPE",
        "Working at height",
        "SUPERVISOR",
        "J. Smith",
        "CLIENT",
        "WARNING: Do not energise",
        "Records are retained for six years.",
    ] {
        assert!(all.contains(&expected.to_string()), "missing {:?}", expected);
    }
}

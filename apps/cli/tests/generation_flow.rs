//! Generation flow against an in-memory counter and stub renderers.

use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cotizador_core::{Block, Document, DocumentComposer, Money, ValidationError};
use cotizador_db::{MemoryStore, PersistenceError, SequenceCounter, COUNTER_KEY};
use cotizador_render::{DocumentRenderer, RenderError, RenderFormat, RenderResult, RenderedArtifact};

use cotizador_cli::generator::{GenerationError, QuotationGenerator};
use cotizador_cli::state::QuotationForm;

/// Keeps every rendered document; fails while `failing` is set.
#[derive(Clone, Default)]
struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<(Document, String)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingRenderer {
    fn fail(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    fn rendered(&self) -> Vec<(Document, String)> {
        self.rendered.lock().unwrap().clone()
    }
}

impl DocumentRenderer for RecordingRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Pdf
    }

    fn render(&self, document: &Document, suggested_file_name: &str) -> RenderResult<RenderedArtifact> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RenderError::MissingAsset {
                path: PathBuf::from("assets/LOGO.jpg"),
            });
        }
        self.rendered
            .lock()
            .unwrap()
            .push((document.clone(), suggested_file_name.to_string()));
        Ok(RenderedArtifact {
            path: PathBuf::from(suggested_file_name),
            format: RenderFormat::Pdf,
            bytes_written: 1,
        })
    }
}

fn setup() -> (MemoryStore, RecordingRenderer, QuotationGenerator<MemoryStore>) {
    let store = MemoryStore::new();
    let renderer = RecordingRenderer::default();
    let generator = QuotationGenerator::new(
        SequenceCounter::new(store.clone()),
        DocumentComposer::default(),
        Box::new(renderer.clone()),
    );
    (store, renderer, generator)
}

fn juan_perez() -> QuotationForm {
    let mut form = QuotationForm::for_client("Juan Perez", "", "123");
    form.add_item("Pintura", "50000").unwrap();
    form.add_item("Latonería", "").unwrap();
    form
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
}

#[tokio::test]
async fn end_to_end_first_quotation() {
    let (store, renderer, mut generator) = setup();
    let mut form = juan_perez();

    let generated = generator.generate(&mut form, date()).await.unwrap();

    assert_eq!(generated.number.label(), "COT-2");
    assert_eq!(generated.total, Money::from_units(50_000));
    assert_eq!(generated.total_display, "$ 50.000");
    assert_eq!(store.peek(COUNTER_KEY).await.as_deref(), Some("2"));

    let rendered = renderer.rendered();
    assert_eq!(rendered.len(), 1);
    let (document, file_name) = &rendered[0];
    assert_eq!(file_name, "Factura_Juan Perez.pdf");

    let table = document.item_table().unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].total_value, "$ 50.000");
    assert_eq!(table.rows[1].description, "Latonería");
    assert_eq!(table.rows[1].total_value, "");
    assert_eq!(table.total.value, "$ 50.000");

    let info = document
        .blocks
        .iter()
        .find_map(|block| match block {
            Block::QuotationInfo(info) => Some(info),
            _ => None,
        })
        .unwrap();
    assert_eq!(info.number, "N° COT-2");
    assert_eq!(info.date, "5/3/2026");

    assert!(form.is_empty());
}

#[tokio::test]
async fn render_failure_leaves_a_gap() {
    let (store, renderer, mut generator) = setup();
    let mut form = juan_perez();

    renderer.fail(true);
    let err = generator.generate(&mut form, date()).await.unwrap_err();
    match err {
        GenerationError::Render { number, .. } => assert_eq!(number.label(), "COT-2"),
        other => panic!("expected render error, got {other:?}"),
    }
    assert_eq!(store.peek(COUNTER_KEY).await.as_deref(), Some("2"));
    assert_eq!(form.items.len(), 2);
    assert_eq!(form.cliente, "Juan Perez");

    renderer.fail(false);
    let generated = generator.generate(&mut form, date()).await.unwrap();
    assert_eq!(generated.number.label(), "COT-3");
    assert_eq!(store.peek(COUNTER_KEY).await.as_deref(), Some("3"));
    assert_eq!(renderer.rendered().len(), 1);
}

#[tokio::test]
async fn validation_failures_issue_nothing() {
    let (store, renderer, mut generator) = setup();

    let mut nameless = juan_perez();
    nameless.cliente = "   ".to_string();
    let err = generator.generate(&mut nameless, date()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Validation(ValidationError::MissingClientName)));

    let mut no_id = juan_perez();
    no_id.cc.clear();
    let err = generator.generate(&mut no_id, date()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Validation(ValidationError::MissingClientId)));

    let mut empty = QuotationForm::for_client("Juan Perez", "", "123");
    let err = generator.generate(&mut empty, date()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Validation(ValidationError::EmptyLineItems)));

    assert_eq!(store.peek(COUNTER_KEY).await, None);
    assert!(renderer.rendered().is_empty());
    assert_eq!(nameless.items.len(), 2);

    // The next valid attempt still gets the first number.
    let mut form = juan_perez();
    let generated = generator.generate(&mut form, date()).await.unwrap();
    assert_eq!(generated.number.label(), "COT-2");
}

#[tokio::test]
async fn persistence_failure_keeps_counter_and_form() {
    let (store, renderer, mut generator) = setup();
    let mut form = juan_perez();

    store.fail_writes(true);
    let err = generator.generate(&mut form, date()).await.unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Persistence(PersistenceError::Write { value: 2, .. })
    ));
    assert_eq!(store.peek(COUNTER_KEY).await, None);
    assert_eq!(form.items.len(), 2);
    assert!(renderer.rendered().is_empty());

    store.fail_writes(false);
    let generated = generator.generate(&mut form, date()).await.unwrap();
    assert_eq!(generated.number.label(), "COT-2");
}

#[tokio::test]
async fn numbers_continue_across_generators_sharing_a_store() {
    let (store, _, mut generator) = setup();
    generator.generate(&mut juan_perez(), date()).await.unwrap();
    drop(generator);

    let mut restarted = QuotationGenerator::new(
        SequenceCounter::new(store.clone()),
        DocumentComposer::default(),
        Box::new(RecordingRenderer::default()),
    );
    let generated = restarted.generate(&mut juan_perez(), date()).await.unwrap();
    assert_eq!(generated.number.label(), "COT-3");
}

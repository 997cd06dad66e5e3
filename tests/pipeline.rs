//! Integration tests for the screening pipeline.
//!
//! PDFs are built in memory with `lopdf`; the screening webhook is a local
//! axum server bound to an ephemeral port, and the language model is a
//! canned [`TextGenerator`]. Nothing here touches the network except the
//! `live_*` test, which is gated behind `E2E_ENABLED`.
//!
//! Run with:
//!   cargo test --test pipeline -- --nocapture

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use resume_screener::{
    ask, document_from_bytes, extract_profile, load_document, profile_and_screen, screen,
    screen_text, Endpoint, Outcome, RequiredField, ScreenError, ScreeningConfig, TextGenerator,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Build a PDF with one page per entry; `None` is a page with no text.
fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 14.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialise PDF");
    buf
}

fn resume_pdf() -> Vec<u8> {
    pdf_with_pages(&[
        Some("Jane Doe - Senior Rust Engineer"),
        None,
        Some("Skills: Rust, Tokio, PostgreSQL"),
    ])
}

// ── Fake webhook ─────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Hook {
    received: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
    body: String,
    delay: Duration,
}

async fn handle(State(hook): State<Hook>, Json(payload): Json<Value>) -> (StatusCode, String) {
    hook.received.lock().unwrap().push(payload);
    if !hook.delay.is_zero() {
        tokio::time::sleep(hook.delay).await;
    }
    (hook.status, hook.body.clone())
}

struct FakeWebhook {
    url: String,
    received: Arc<Mutex<Vec<Value>>>,
}

impl FakeWebhook {
    fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    fn last(&self) -> Value {
        self.received
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("webhook was not called")
    }
}

async fn spawn_webhook(status: StatusCode, body: &str, delay: Duration) -> FakeWebhook {
    let received = Arc::new(Mutex::new(Vec::new()));
    let hook = Hook {
        received: Arc::clone(&received),
        status,
        body: body.to_string(),
        delay,
    };
    let app = Router::new()
        .route("/webhook/screen", post(handle))
        .with_state(hook);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeWebhook {
        url: format!("http://{addr}/webhook/screen"),
        received,
    }
}

// ── Fake model ───────────────────────────────────────────────────────────────

struct Canned {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl Canned {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for Canned {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, ScreenError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

fn config_for(hook: &FakeWebhook, generator: Option<Arc<Canned>>) -> ScreeningConfig {
    let mut builder = ScreeningConfig::builder().webhook_url(hook.url.clone());
    if let Some(generator) = generator {
        builder = builder.generator(generator);
    }
    builder.build().unwrap()
}

// ── Extraction ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_multi_page_extraction_skips_blank_pages() {
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    assert_eq!(doc.page_count, 3);
    assert_eq!(doc.text_pages, vec![1, 3]);
    assert!(doc.text.contains("Jane Doe"), "text: {:?}", doc.text);
    assert!(doc.text.contains("PostgreSQL"), "text: {:?}", doc.text);

    let jane = doc.text.find("Jane Doe").unwrap();
    let skills = doc.text.find("Skills").unwrap();
    assert!(jane < skills, "pages must stay in order");
    assert!(!doc.text.starts_with(char::is_whitespace));
    assert!(!doc.text.ends_with(char::is_whitespace));
}

#[tokio::test]
async fn test_load_document_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.pdf");
    std::fs::write(&path, resume_pdf()).unwrap();

    let doc = load_document(&path).await.unwrap();
    assert_eq!(doc.page_count, 3);
    assert!(doc.word_count() >= 8);
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let err = load_document("/definitely/not/here.pdf").await.unwrap_err();
    assert!(matches!(err, ScreenError::FileNotFound { .. }), "{err:?}");
    assert_eq!(err.category(), "document_format");
}

#[tokio::test]
async fn test_non_pdf_bytes_rejected() {
    let err = document_from_bytes(b"PK\x03\x04 this is a zip".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, ScreenError::NotAPdf { .. }), "{err:?}");
}

#[tokio::test]
async fn test_truncated_pdf_is_a_document_format_error() {
    let err = document_from_bytes(b"%PDF-1.7\n garbage without any objects".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.category(), "document_format", "{err:?}");
}

#[tokio::test]
async fn test_textless_pdf_blocks_every_action() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"status":"SELECTED"}"#, Duration::ZERO).await;
    let model = Canned::new("irrelevant");
    let config = config_for(&hook, Some(Arc::clone(&model)));

    let doc = document_from_bytes(pdf_with_pages(&[None, None])).await.unwrap();
    assert_eq!(doc.page_count, 2);
    assert!(doc.text.is_empty());
    assert!(doc.text_pages.is_empty());

    let err = screen(&doc, "Rust engineer", "hr@example.com", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ScreenError::DocumentFormat { .. }), "{err:?}");

    let err = ask(&doc, "Name?", &config).await.unwrap_err();
    assert!(matches!(err, ScreenError::DocumentFormat { .. }), "{err:?}");

    assert_eq!(hook.calls(), 0);
    assert!(model.prompts.lock().unwrap().is_empty());
}

// ── Screening ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_selected_screening_posts_once_with_verbatim_fields() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"status":"SELECTED"}"#, Duration::ZERO).await;
    let config = config_for(&hook, None);
    let doc = document_from_bytes(pdf_with_pages(&[Some("Jane Doe, 5 years experience")]))
        .await
        .unwrap();

    let job = "  Senior Engineer\nRemote  ";
    let result = screen(&doc, job, "jane@example.com", &config).await.unwrap();

    assert_eq!(result.outcome, Outcome::Positive);
    assert_eq!(
        result.message,
        "Candidate is suitable! Selection email sent successfully."
    );
    assert_eq!(hook.calls(), 1);

    let payload = hook.last();
    assert_eq!(payload["resume_text"], doc.text.as_str());
    assert!(payload["resume_text"].as_str().unwrap().contains("Jane Doe"));
    assert_eq!(payload["job_description"], job);
    assert_eq!(payload["recipient_email"], "jane@example.com");
    assert_eq!(payload.as_object().unwrap().len(), 3);
    assert_eq!(result.request.resume_text(), doc.text);
}

#[tokio::test]
async fn test_rejected_and_unknown_statuses() {
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let hook = spawn_webhook(StatusCode::OK, r#"{"status":"REJECTED"}"#, Duration::ZERO).await;
    let result = screen(&doc, "Job", "a@b.c", &config_for(&hook, None))
        .await
        .unwrap();
    assert_eq!(result.outcome, Outcome::Negative);
    assert_eq!(result.message, "Candidate is not suitable. Rejection email sent.");

    for body in [
        r#"{"status":"selected"}"#,
        r#"{"status":"PENDING"}"#,
        r#"{"result":"SELECTED"}"#,
        "Workflow was started",
        "",
    ] {
        let hook = spawn_webhook(StatusCode::OK, body, Duration::ZERO).await;
        let result = screen(&doc, "Job", "a@b.c", &config_for(&hook, None))
            .await
            .unwrap();
        assert_eq!(result.outcome, Outcome::Neutral, "body {body:?}");
        assert_eq!(result.message, "Resume processed.");
        assert_eq!(hook.calls(), 1);
    }
}

#[tokio::test]
async fn test_webhook_error_status_carries_raw_body() {
    let hook = spawn_webhook(
        StatusCode::INTERNAL_SERVER_ERROR,
        "node 'Send Email' failed",
        Duration::ZERO,
    )
    .await;
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let err = screen(&doc, "Job", "hr@example.com", &config_for(&hook, None))
        .await
        .unwrap_err();
    match &err {
        ScreenError::Workflow { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "node 'Send Email' failed");
        }
        other => panic!("expected Workflow, got {other:?}"),
    }
    assert_eq!(err.category(), "workflow");
    assert_eq!(err.raw_detail(), Some("node 'Send Email' failed"));
    assert_eq!(hook.calls(), 1, "no retry after a workflow failure");
}

#[tokio::test]
async fn test_missing_inputs_make_no_calls() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"status":"SELECTED"}"#, Duration::ZERO).await;
    let config = config_for(&hook, None);

    let err = screen_text("", "   ", "hr@example.com", &config)
        .await
        .unwrap_err();
    match err {
        ScreenError::Validation { missing } => assert_eq!(
            missing,
            vec![RequiredField::ResumeText, RequiredField::JobDescription]
        ),
        other => panic!("expected Validation, got {other:?}"),
    }

    let doc = document_from_bytes(resume_pdf()).await.unwrap();
    let err = screen(&doc, "Job", "\n", &config).await.unwrap_err();
    assert!(err.to_string().contains("recipient email"), "{err}");

    assert_eq!(hook.calls(), 0);
}

#[tokio::test]
async fn test_webhook_timeout_is_connectivity() {
    let hook = spawn_webhook(
        StatusCode::OK,
        r#"{"status":"SELECTED"}"#,
        Duration::from_secs(5),
    )
    .await;
    let config = ScreeningConfig::builder()
        .webhook_url(hook.url.clone())
        .webhook_timeout_secs(1)
        .build()
        .unwrap();
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let err = screen(&doc, "Job", "hr@example.com", &config)
        .await
        .unwrap_err();
    match &err {
        ScreenError::Connectivity { endpoint, .. } => assert_eq!(*endpoint, Endpoint::Webhook),
        other => panic!("expected Connectivity, got {other:?}"),
    }
    assert_eq!(err.category(), "connectivity");
}

#[tokio::test]
async fn test_screen_without_webhook_url_is_config_error() {
    let config = ScreeningConfig::builder().build().unwrap();
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let err = screen(&doc, "Job", "hr@example.com", &config)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "config", "{err:?}");
}

// ── Model-backed actions ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_ask_sends_question_and_trims_answer() {
    let hook = spawn_webhook(StatusCode::OK, "{}", Duration::ZERO).await;
    let model = Canned::new("\n  Jane Doe  \n");
    let config = config_for(&hook, Some(Arc::clone(&model)));
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let exchange = ask(&doc, "What is the candidate's name?", &config)
        .await
        .unwrap();
    assert_eq!(exchange.answer, "Jane Doe");
    assert_eq!(exchange.question, "What is the candidate's name?");
    assert_eq!(exchange.document_text, doc.text);

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("What is the candidate's name?"));
    assert!(prompts[0].contains("Jane Doe - Senior Rust Engineer"));
    assert_eq!(hook.calls(), 0);
}

#[tokio::test]
async fn test_ask_requires_a_question() {
    let hook = spawn_webhook(StatusCode::OK, "{}", Duration::ZERO).await;
    let model = Canned::new("unused");
    let config = config_for(&hook, Some(Arc::clone(&model)));
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let err = ask(&doc, "  ", &config).await.unwrap_err();
    assert!(matches!(err, ScreenError::Validation { .. }), "{err:?}");
    assert!(model.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_extract_profile_parses_object() {
    let hook = spawn_webhook(StatusCode::OK, "{}", Duration::ZERO).await;
    let model = Canned::new(r#"{"name":"Jane","skills":["Rust","Tokio"],"github":"janedoe"}"#);
    let config = config_for(&hook, Some(model));
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let profile = extract_profile(&doc, &config).await.unwrap();
    assert_eq!(profile.name.as_deref(), Some("Jane"));
    assert_eq!(profile.skills, vec!["Rust", "Tokio"]);
    assert_eq!(profile.get("github").as_deref(), Some("janedoe"));
}

#[tokio::test]
async fn test_profile_and_screen_happy_path() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"status":"REJECTED"}"#, Duration::ZERO).await;
    let model = Canned::new(r#"{"name":"Jane"}"#);
    let config = config_for(&hook, Some(model));
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let result = profile_and_screen(&doc, "Job", "hr@example.com", &config)
        .await
        .unwrap();
    assert_eq!(result.profile.name.as_deref(), Some("Jane"));
    assert_eq!(result.outcome.outcome, Outcome::Negative);
    assert_eq!(hook.calls(), 1);
}

#[tokio::test]
async fn test_malformed_extraction_halts_before_webhook() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"status":"SELECTED"}"#, Duration::ZERO).await;
    let model = Canned::new("Sure! Here is the JSON you asked for: not json");
    let config = config_for(&hook, Some(model));
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let err = profile_and_screen(&doc, "Job", "hr@example.com", &config)
        .await
        .unwrap_err();
    match &err {
        ScreenError::ExtractionParse { raw, .. } => {
            assert_eq!(raw, "Sure! Here is the JSON you asked for: not json");
        }
        other => panic!("expected ExtractionParse, got {other:?}"),
    }
    assert_eq!(hook.calls(), 0);
}

#[tokio::test]
async fn test_profile_and_screen_validates_before_model_call() {
    let hook = spawn_webhook(StatusCode::OK, r#"{"status":"SELECTED"}"#, Duration::ZERO).await;
    let model = Canned::new(r#"{"name":"Jane"}"#);
    let config = config_for(&hook, Some(Arc::clone(&model)));
    let doc = document_from_bytes(resume_pdf()).await.unwrap();

    let err = profile_and_screen(&doc, "Job", "", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ScreenError::Validation { .. }), "{err:?}");
    assert!(model.prompts.lock().unwrap().is_empty());
    assert_eq!(hook.calls(), 0);
}

// ── Live (opt-in) ────────────────────────────────────────────────────────────

/// Uses whatever provider the environment configures (OPENAI_API_KEY, …).
#[tokio::test]
async fn live_ask_against_configured_provider() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run live tests");
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter("resume_screener=debug")
        .try_init();

    let config = ScreeningConfig::builder().build().unwrap();
    let doc = document_from_bytes(resume_pdf()).await.unwrap();
    let exchange = ask(&doc, "What is the candidate's name?", &config)
        .await
        .unwrap();

    println!("answer: {}", exchange.answer);
    assert!(exchange.answer.contains("Jane"), "{}", exchange.answer);
}

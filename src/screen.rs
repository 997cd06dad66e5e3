//! User-action entry points.
//!
//! Each function is one independent action over a [`Document`]:
//!
//! | Action | Function | Network |
//! |--------|----------|---------|
//! | upload | [`load_document`], [`document_from_bytes`] | none |
//! | ask a question | [`ask`] | one model call |
//! | extract structured fields | [`extract_profile`] | one model call |
//! | screen | [`screen`], [`screen_text`] | one webhook POST |
//! | extract, then screen | [`profile_and_screen`] | one model call, then at most one POST |
//!
//! Every input is validated before any network call, and every failure is a
//! [`ScreenError`] that ends the action.

use crate::config::ScreeningConfig;
use crate::error::{RequiredField, ScreenError};
use crate::model::{
    Document, ProfiledScreening, QaExchange, ScreeningOutcome, ScreeningRequest, StructuredResume,
};
use crate::pipeline::classify::classify_response;
use crate::pipeline::dispatch::WebhookDispatcher;
use crate::pipeline::{extract, input, llm, structured};
use crate::prompts;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read a PDF from disk and extract its text.
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document, ScreenError> {
    let path = path.as_ref();
    info!("Loading resume: {}", path.display());
    let bytes = input::read_pdf(path).await?;
    extract::extract_document(bytes).await
}

/// Extract text from PDF bytes already in memory (e.g. an upload body).
pub async fn document_from_bytes(bytes: Vec<u8>) -> Result<Document, ScreenError> {
    extract::extract_document(bytes).await
}

/// Answer one free-form question strictly from the document.
///
/// The answer is the model's output with surrounding whitespace trimmed and
/// no other post-processing. When the document lacks the information the
/// model is instructed to answer [`prompts::NOT_AVAILABLE_ANSWER`].
pub async fn ask(
    document: &Document,
    question: &str,
    config: &ScreeningConfig,
) -> Result<QaExchange, ScreenError> {
    let text = document.require_text()?;
    if question.trim().is_empty() {
        return Err(ScreenError::Validation {
            missing: vec![RequiredField::Question],
        });
    }

    let generator = llm::resolve_generator(config)?;
    let prompt = prompts::qa_prompt(text, question.trim());
    debug!("Q&A prompt: {} chars", prompt.len());

    let answer = generator
        .generate(prompts::QA_SYSTEM_PROMPT, &prompt)
        .await?
        .trim()
        .to_string();
    info!("Answered question ({} chars)", answer.len());

    Ok(QaExchange {
        document_text: text.to_string(),
        question: question.to_string(),
        answer,
    })
}

/// Ask the model for the structured resume fields and parse its reply.
///
/// # Errors
/// [`ScreenError::ExtractionParse`] when the reply is not a JSON object; the
/// raw reply is attached and nothing is retried.
pub async fn extract_profile(
    document: &Document,
    config: &ScreeningConfig,
) -> Result<StructuredResume, ScreenError> {
    let text = document.require_text()?;
    let generator = llm::resolve_generator(config)?;

    let raw = generator
        .generate(
            prompts::EXTRACTION_SYSTEM_PROMPT,
            &prompts::extraction_prompt(text),
        )
        .await?;

    let profile = structured::parse_structured(&raw).inspect_err(|e| {
        warn!("Structured extraction rejected: {e}");
    })?;
    info!(
        "Structured extraction: name={:?}, {} skills",
        profile.name,
        profile.skills.len()
    );
    Ok(profile)
}

/// Forward the document text, job description and recipient email to the
/// screening webhook and classify the reply.
pub async fn screen(
    document: &Document,
    job_description: &str,
    recipient_email: &str,
    config: &ScreeningConfig,
) -> Result<ScreeningOutcome, ScreenError> {
    let text = document.require_text()?;
    screen_text(text, job_description, recipient_email, config).await
}

/// Like [`screen`], for resume text that did not come from a PDF.
pub async fn screen_text(
    resume_text: &str,
    job_description: &str,
    recipient_email: &str,
    config: &ScreeningConfig,
) -> Result<ScreeningOutcome, ScreenError> {
    let request = ScreeningRequest::new(resume_text, job_description, recipient_email)?;
    dispatch(request, config).await
}

/// Structured extraction first, then screening.
///
/// A structured-extraction failure halts the flow before the webhook is
/// contacted. Inputs are validated before the model is called.
pub async fn profile_and_screen(
    document: &Document,
    job_description: &str,
    recipient_email: &str,
    config: &ScreeningConfig,
) -> Result<ProfiledScreening, ScreenError> {
    let text = document.require_text()?;
    let request = ScreeningRequest::new(text, job_description, recipient_email)?;
    config.require_webhook_url()?;

    let profile = extract_profile(document, config).await?;
    let outcome = dispatch(request, config).await?;
    Ok(ProfiledScreening { profile, outcome })
}

/// Synchronous wrapper around [`screen`].
///
/// Creates a temporary tokio runtime internally; do not call from async code.
pub fn screen_sync(
    document: &Document,
    job_description: &str,
    recipient_email: &str,
    config: &ScreeningConfig,
) -> Result<ScreeningOutcome, ScreenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ScreenError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(screen(document, job_description, recipient_email, config))
}

async fn dispatch(
    request: ScreeningRequest,
    config: &ScreeningConfig,
) -> Result<ScreeningOutcome, ScreenError> {
    let dispatcher = WebhookDispatcher::from_config(config)?;
    let response = dispatcher.dispatch(&request).await?;
    let outcome = classify_response(&response);
    info!("Screening outcome: {:?} ({:?})", outcome, response.status());

    Ok(ScreeningOutcome {
        outcome,
        message: outcome.message(),
        response,
        request,
    })
}

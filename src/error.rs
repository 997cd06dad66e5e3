//! Error types for the resume-screener library.
//!
//! Every user action (load a document, ask a question, extract a profile,
//! dispatch a screening request) returns `Result<_, ScreenError>`. All
//! variants are terminal for the action that raised them: nothing is retried
//! and nothing is partially committed. The user corrects the input or the
//! environment and re-issues the action.
//!
//! The variants group into five user-facing categories, exposed through
//! [`ScreenError::category`]:
//!
//! | Category | Variants |
//! |----------|----------|
//! | validation | [`ScreenError::Validation`] |
//! | document format | [`ScreenError::FileNotFound`], [`ScreenError::PermissionDenied`], [`ScreenError::NotAPdf`], [`ScreenError::DocumentFormat`] |
//! | extraction parse | [`ScreenError::ExtractionParse`] |
//! | workflow | [`ScreenError::Workflow`] |
//! | connectivity | [`ScreenError::Connectivity`] |
//!
//! Configuration and internal failures form a sixth, non-user bucket.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the resume-screener library.
#[derive(Debug, Error)]
pub enum ScreenError {
    // ── Validation ────────────────────────────────────────────────────────
    /// One or more mandatory inputs are empty.
    #[error("Missing mandatory input: {}", join_fields(.missing))]
    Validation { missing: Vec<RequiredField> },

    // ── Document errors ───────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bytes do not start with the `%PDF` magic.
    #[error("Input is not a PDF document (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// The PDF could not be parsed, or it has no extractable text where text is required.
    #[error("Unreadable document: {detail}")]
    DocumentFormat { detail: String },

    // ── Model errors ──────────────────────────────────────────────────────
    /// The model's structured output is not a JSON object.
    ///
    /// `raw` holds the unparsed model text for diagnosis.
    #[error("Model returned invalid JSON: {detail}")]
    ExtractionParse { detail: String, raw: String },

    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Webhook errors ────────────────────────────────────────────────────
    /// The webhook answered with a non-2xx status.
    #[error("Workflow failed with HTTP {status}: {body}")]
    Workflow { status: u16, body: String },

    /// The webhook or the model endpoint could not be reached or timed out.
    #[error("Failed to reach the {endpoint}: {detail}")]
    Connectivity { endpoint: Endpoint, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed, or a required setting is absent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScreenError {
    /// Short, stable name of the error category shown to users and in logs.
    pub fn category(&self) -> &'static str {
        match self {
            ScreenError::Validation { .. } => "validation",
            ScreenError::FileNotFound { .. }
            | ScreenError::PermissionDenied { .. }
            | ScreenError::NotAPdf { .. }
            | ScreenError::DocumentFormat { .. } => "document_format",
            ScreenError::ExtractionParse { .. } => "extraction_parse",
            ScreenError::Workflow { .. } => "workflow",
            ScreenError::Connectivity { .. } => "connectivity",
            ScreenError::ProviderNotConfigured { .. } | ScreenError::InvalidConfig(_) => "config",
            ScreenError::Internal(_) => "internal",
        }
    }

    /// Raw diagnostic text attached to the error, if any.
    ///
    /// For [`ScreenError::ExtractionParse`] this is the model output; for
    /// [`ScreenError::Workflow`] it is the webhook response body.
    pub fn raw_detail(&self) -> Option<&str> {
        match self {
            ScreenError::ExtractionParse { raw, .. } => Some(raw),
            ScreenError::Workflow { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// The mandatory user inputs checked before a model call or a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    ResumeText,
    JobDescription,
    RecipientEmail,
    Question,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequiredField::ResumeText => "resume text",
            RequiredField::JobDescription => "job description",
            RequiredField::RecipientEmail => "recipient email",
            RequiredField::Question => "question",
        };
        f.write_str(label)
    }
}

/// Which remote endpoint a [`ScreenError::Connectivity`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Webhook,
    LanguageModel,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Webhook => f.write_str("automation workflow"),
            Endpoint::LanguageModel => f.write_str("language model"),
        }
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_lists_every_missing_field() {
        let e = ScreenError::Validation {
            missing: vec![RequiredField::JobDescription, RequiredField::RecipientEmail],
        };
        let msg = e.to_string();
        assert!(msg.contains("job description, recipient email"), "got: {msg}");
        assert_eq!(e.category(), "validation");
    }

    #[test]
    fn workflow_exposes_raw_body() {
        let e = ScreenError::Workflow {
            status: 500,
            body: "upstream exploded".into(),
        };
        assert!(e.to_string().contains("HTTP 500"));
        assert_eq!(e.raw_detail(), Some("upstream exploded"));
        assert_eq!(e.category(), "workflow");
    }

    #[test]
    fn extraction_parse_keeps_model_output() {
        let e = ScreenError::ExtractionParse {
            detail: "expected value at line 1 column 1".into(),
            raw: "not json".into(),
        };
        assert_eq!(e.raw_detail(), Some("not json"));
        assert_eq!(e.category(), "extraction_parse");
    }

    #[test]
    fn connectivity_names_the_endpoint() {
        let e = ScreenError::Connectivity {
            endpoint: Endpoint::Webhook,
            detail: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("automation workflow"), "got: {msg}");
        assert!(msg.contains("connection refused"));
        assert_eq!(e.raw_detail(), None);
    }

    #[test]
    fn document_errors_share_a_category() {
        let not_pdf = ScreenError::NotAPdf {
            magic: b"PK\x03\x04".to_vec(),
        };
        let missing = ScreenError::FileNotFound {
            path: PathBuf::from("/nope.pdf"),
        };
        assert_eq!(not_pdf.category(), "document_format");
        assert_eq!(missing.category(), "document_format");
    }
}

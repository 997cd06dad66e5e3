//! Value types that flow between pipeline stages.
//!
//! None of these are mutated after construction; each user action produces
//! fresh values that replace the previous ones wholesale.

use crate::error::{RequiredField, ScreenError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Document ─────────────────────────────────────────────────────────────

/// An uploaded PDF and its derived plain text.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Raw PDF content. Kept in memory only.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Newline-joined text of every page that yielded text.
    pub text: String,
    /// Total number of pages in the PDF, including pages without text.
    pub page_count: usize,
    /// 1-indexed numbers of the pages that contributed to `text`.
    pub text_pages: Vec<usize>,
}

impl Document {
    /// Returns the text, or [`ScreenError::DocumentFormat`] when no page yielded any.
    ///
    /// Every stage that needs text (Q&A, structured extraction, screening)
    /// goes through this gate.
    pub fn require_text(&self) -> Result<&str, ScreenError> {
        if self.text.is_empty() {
            return Err(ScreenError::DocumentFormat {
                detail: format!(
                    "no extractable text in any of the {} page(s); scanned resumes are not supported",
                    self.page_count
                ),
            });
        }
        Ok(&self.text)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

// ── Screening request / response ─────────────────────────────────────────

/// The JSON payload POSTed to the screening webhook.
///
/// Only constructible through [`ScreeningRequest::new`], so every instance
/// has three non-empty fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningRequest {
    resume_text: String,
    job_description: String,
    recipient_email: String,
}

impl ScreeningRequest {
    /// Build a request, failing with [`ScreenError::Validation`] naming every
    /// empty (or whitespace-only) field.
    ///
    /// Values are stored verbatim; trimming is only used for the emptiness check.
    pub fn new(
        resume_text: impl Into<String>,
        job_description: impl Into<String>,
        recipient_email: impl Into<String>,
    ) -> Result<Self, ScreenError> {
        let request = Self {
            resume_text: resume_text.into(),
            job_description: job_description.into(),
            recipient_email: recipient_email.into(),
        };

        let missing: Vec<RequiredField> = [
            (RequiredField::ResumeText, &request.resume_text),
            (RequiredField::JobDescription, &request.job_description),
            (RequiredField::RecipientEmail, &request.recipient_email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ScreenError::Validation { missing });
        }
        Ok(request)
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn recipient_email(&self) -> &str {
        &self.recipient_email
    }
}

/// The webhook's decision as carried in its `status` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreeningStatus {
    Selected,
    Rejected,
    /// Any other value, or no `status` field at all.
    Other(Option<String>),
}

/// A successful (2xx) webhook reply.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResponse {
    /// HTTP status code of the reply.
    pub http_status: u16,
    /// Parsed JSON body, or `Value::Null` if the body was not JSON.
    pub body: Value,
    /// The body exactly as received.
    pub raw: String,
}

impl ScreeningResponse {
    /// Wrap a raw reply body. Non-JSON bodies become `Value::Null`.
    pub fn from_raw(http_status: u16, raw: String) -> Self {
        let body = serde_json::from_str(&raw).unwrap_or(Value::Null);
        Self {
            http_status,
            body,
            raw,
        }
    }

    pub fn status(&self) -> ScreeningStatus {
        match self.body.get("status") {
            Some(Value::String(s)) if s == "SELECTED" => ScreeningStatus::Selected,
            Some(Value::String(s)) if s == "REJECTED" => ScreeningStatus::Rejected,
            Some(Value::String(s)) => ScreeningStatus::Other(Some(s.clone())),
            Some(other) => ScreeningStatus::Other(Some(other.to_string())),
            None => ScreeningStatus::Other(None),
        }
    }
}

// ── Outcome ──────────────────────────────────────────────────────────────

/// The three user-visible results of a screening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Webhook reported `SELECTED`.
    Positive,
    /// Webhook reported `REJECTED`.
    Negative,
    /// Anything else: the resume was processed, no decision to report.
    Neutral,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Positive => "Candidate is suitable! Selection email sent successfully.",
            Outcome::Negative => "Candidate is not suitable. Rejection email sent.",
            Outcome::Neutral => "Resume processed.",
        }
    }
}

/// Everything a caller needs to render the result of a screening dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    pub outcome: Outcome,
    pub message: &'static str,
    pub response: ScreeningResponse,
    pub request: ScreeningRequest,
}

/// Result of the extract-then-screen flow.
#[derive(Debug, Clone, Serialize)]
pub struct ProfiledScreening {
    pub profile: StructuredResume,
    pub outcome: ScreeningOutcome,
}

// ── Model-derived values ─────────────────────────────────────────────────

/// One question answered against one document. No history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaExchange {
    pub document_text: String,
    pub question: String,
    pub answer: String,
}

/// Structured fields a model extracted from a resume.
///
/// Every field is optional when parsing; keys the schema does not name are
/// kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub current_role: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub total_experience: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub projects: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StructuredResume {
    /// Look up a field by its JSON key as text, covering schema and extra keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let scalar = match key {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "current_role" => &self.current_role,
            "total_experience" => &self.total_experience,
            "summary" => &self.summary,
            "skills" => return non_empty_list(&self.skills),
            "education" => return non_empty_list(&self.education),
            "projects" => return non_empty_list(&self.projects),
            other => return self.extra.get(other).and_then(lenient::scalar_text),
        };
        scalar.clone()
    }
}

fn non_empty_list(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(", "))
}

/// Deserializers that accept the loose shapes models tend to emit.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings, numbers and booleans become text; `null` and empty strings become `None`.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar_text(&value))
    }

    /// Arrays of scalars, or a lone scalar, become a list of text.
    pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
            other => scalar_text(&other).into_iter().collect(),
        })
    }

    pub fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            // Objects inside lists (e.g. {"degree": .., "institution": ..}) keep their JSON form.
            Value::Object(_) => Some(value.to_string()),
            _ => None,
        }
    }
}

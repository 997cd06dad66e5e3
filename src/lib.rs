//! # resume-screener
//!
//! Extract the text of a PDF resume, ask a language model about it, and
//! forward it to a workflow-automation webhook that screens the candidate
//! against a job description.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     read the file, check the %PDF magic
//!  ├─ 2. Extract   per-page text via pdf-extract, blank pages skipped
//!  │
//!  ├─▶ Ask         one model call → trimmed answer
//!  ├─▶ Profile     one model call → strict JSON → StructuredResume
//!  └─▶ Screen      one webhook POST → status → Positive | Negative | Neutral
//! ```
//!
//! The three actions are independent and share one [`Document`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_screener::{load_document, screen, ScreeningConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScreeningConfig::builder()
//!         .webhook_url("https://automation.example.com/webhook/screen")
//!         .build()?;
//!     let resume = load_document("resume.pdf").await?;
//!     let result = screen(&resume, "Senior Rust Engineer", "hr@example.com", &config).await?;
//!     println!("{}", result.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume-screen` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod screen;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ScreeningConfig, ScreeningConfigBuilder};
pub use error::{Endpoint, RequiredField, ScreenError};
pub use model::{
    Document, Outcome, ProfiledScreening, QaExchange, ScreeningOutcome, ScreeningRequest,
    ScreeningResponse, ScreeningStatus, StructuredResume,
};
pub use pipeline::classify::classify;
pub use pipeline::llm::TextGenerator;
pub use screen::{
    ask, document_from_bytes, extract_profile, load_document, profile_and_screen, screen,
    screen_sync, screen_text,
};

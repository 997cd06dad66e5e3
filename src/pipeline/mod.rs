//! Pipeline stages for resume screening.
//!
//! Each submodule implements exactly one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ Document ──┬──▶ llm ──▶ (answer | structured)
//! (path)    (pdf-extract)         └──▶ dispatch ──▶ classify
//!                                      (webhook)     (Outcome)
//! ```
//!
//! 1. [`input`]      — read a local file and check the `%PDF` magic
//! 2. [`extract`]    — per-page text extraction on the blocking pool
//! 3. [`llm`]        — the [`llm::TextGenerator`] seam and its provider-backed impl
//! 4. [`structured`] — strict JSON parsing of the extraction reply
//! 5. [`dispatch`]   — the single webhook POST
//! 6. [`classify`]   — pure mapping of the webhook reply to an outcome

pub mod classify;
pub mod dispatch;
pub mod extract;
pub mod input;
pub mod llm;
pub mod structured;

//! Response classification: webhook JSON → [`Outcome`].
//!
//! Total and pure. Only an exact, case-sensitive `"SELECTED"` or
//! `"REJECTED"` string in the top-level `status` field yields a decision;
//! every other shape, including a missing field, a non-object body and
//! `Value::Null` for non-JSON replies, is [`Outcome::Neutral`].
//!
//! Treating unknown shapes as "processed" is a permissive default inherited
//! from the workflow contract. Do not turn it into an error without product
//! sign-off.

use crate::model::{Outcome, ScreeningResponse};
use serde_json::Value;

/// Map a webhook response body to an outcome.
pub fn classify(body: &Value) -> Outcome {
    match body.get("status").and_then(Value::as_str) {
        Some("SELECTED") => Outcome::Positive,
        Some("REJECTED") => Outcome::Negative,
        _ => Outcome::Neutral,
    }
}

/// Classify a parsed webhook reply.
pub fn classify_response(response: &ScreeningResponse) -> Outcome {
    classify(&response.body)
}

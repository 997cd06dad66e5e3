//! Prompts for document Q&A and structured resume extraction.
//!
//! Every prompt the crate sends lives here so the wording can be inspected
//! by unit tests without a live model.

/// Exact sentence the model must reply with when the document lacks the answer.
pub const NOT_AVAILABLE_ANSWER: &str = "Information not available in the document.";

/// System prompt for free-form questions about a document.
pub const QA_SYSTEM_PROMPT: &str = "You are a careful assistant that answers questions about a single document. \
You never use outside knowledge.";

/// System prompt for structured extraction.
pub const EXTRACTION_SYSTEM_PROMPT: &str = "You are a precise resume parser. \
You respond with a single JSON object and nothing else.";

/// JSON shape the model must produce for structured extraction.
pub const RESUME_SCHEMA: &str = r#"{
  "name": "",
  "email": "",
  "phone": "",
  "current_role": "",
  "total_experience": "",
  "skills": [],
  "education": [],
  "projects": [],
  "summary": ""
}"#;

/// Build the user prompt for a question about `document_text`.
pub fn qa_prompt(document_text: &str, question: &str) -> String {
    format!(
        r#"Answer the question using ONLY the document below.

Rules:
1. Base the answer strictly on the document content.
2. If the document does not contain the requested information, reply with exactly:
   "{NOT_AVAILABLE_ANSWER}"
3. Keep the answer concise.

Document:
"""
{document_text}
"""

Question: {question}

Answer:"#
    )
}

/// Build the user prompt asking for `RESUME_SCHEMA` filled from `resume_text`.
pub fn extraction_prompt(resume_text: &str) -> String {
    format!(
        r#"Extract the candidate's details from the resume below.

Return ONLY a valid JSON object with exactly this structure:
{RESUME_SCHEMA}

Rules:
- Do NOT wrap the output in markdown or ```json fences
- Do NOT add explanations, comments or any text outside the JSON object
- Use "" for missing text fields and [] for missing lists

Resume:
"""
{resume_text}
""""#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_prompt_embeds_document_and_question() {
        let p = qa_prompt("Jane Doe, 5 years experience", "How many years of experience?");
        assert!(p.contains("Jane Doe, 5 years experience"));
        assert!(p.contains("Question: How many years of experience?"));
        assert!(p.contains(NOT_AVAILABLE_ANSWER));
        assert!(p.contains("concise"));
    }

    #[test]
    fn extraction_prompt_carries_schema_and_constraints() {
        let p = extraction_prompt("Jane Doe");
        assert!(p.contains(RESUME_SCHEMA));
        assert!(p.contains("ONLY a valid JSON object"));
        assert!(p.contains("markdown"));
        assert!(p.contains("explanations"));
        assert!(p.contains("Jane Doe"));
    }

    #[test]
    fn schema_is_valid_json_with_every_field() {
        let v: serde_json::Value = serde_json::from_str(RESUME_SCHEMA).unwrap();
        for key in [
            "name",
            "email",
            "phone",
            "current_role",
            "total_experience",
            "skills",
            "education",
            "projects",
            "summary",
        ] {
            assert!(v.get(key).is_some(), "schema lacks {key}");
        }
    }
}

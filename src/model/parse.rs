//! Turning raw model text into a reply.
//!
//! Small local models wrap JSON in markdown fences and sometimes ignore the schema
//! altogether, so parsing has two outcomes and neither is an error.

use std::sync::LazyLock;

use regex::Regex;

use super::types::AssistantReply;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?").expect("valid fence regex"));

/// Result of interpreting model text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    /// The text matched the `{response, action}` schema.
    Structured(AssistantReply),
    /// Anything else, kept verbatim (after fence stripping) as the reply text.
    PlainText(String),
}

impl ModelOutput {
    pub fn into_reply(self) -> AssistantReply {
        match self {
            Self::Structured(reply) => reply,
            Self::PlainText(text) => AssistantReply::text(text),
        }
    }
}

/// Remove markdown code-fence markers and any stray backticks or whitespace around
/// the payload.
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE
        .replace_all(raw.trim(), "")
        .trim_matches(|c: char| c == '`' || c.is_whitespace())
        .to_string()
}

pub fn parse_reply(raw: &str) -> ModelOutput {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<AssistantReply>(&cleaned) {
        Ok(reply) => ModelOutput::Structured(reply),
        Err(e) => {
            tracing::warn!(error = %e, raw = %raw, "model output is not valid reply JSON, using it as plain text");
            ModelOutput::PlainText(cleaned)
        }
    }
}

//! Structured reply schema the model is asked to produce.

use serde::{Deserialize, Deserializer, Serialize};

/// Device action proposed by the model. Every field may be absent; JSON `null` and
/// empty strings are treated the same as a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default, deserialize_with = "non_empty")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub entity_id: Option<String>,
}

/// `{"response": ..., "action": ...}` as emitted by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub response: String,
    #[serde(default)]
    pub action: Option<ActionRequest>,
}

impl AssistantReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            action: None,
        }
    }
}

fn non_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(d)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A hub entity as shown to the model. Fetched fresh on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub entity_id: String,
    pub name: String,
    pub state: String,
    pub area: String,
    /// Attributes flattened to `key=value` strings.
    pub attributes: Vec<String>,
}

/// One element of the hub's `GET /api/states` response.
#[derive(Debug, Deserialize)]
pub struct RawEntityState {
    pub entity_id: String,
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub area_id: Option<String>,
}

/// Status code and body text of a service call. Network failures are folded into a
/// synthetic 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOutcome {
    pub status: u16,
    pub body: String,
}

impl ServiceOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<RawEntityState> for DeviceState {
    fn from(raw: RawEntityState) -> Self {
        let name = raw
            .name
            .or_else(|| {
                raw.attributes
                    .get("friendly_name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown".to_string());
        let area = raw
            .area_name
            .or(raw.area_id)
            .unwrap_or_else(|| "Unknown".to_string());
        let attributes = raw
            .attributes
            .iter()
            .map(|(k, v)| format!("{k}={}", value_text(v)))
            .collect();

        Self {
            entity_id: raw.entity_id,
            name,
            state: value_text(&raw.state),
            area,
            attributes,
        }
    }
}

//! Executing the model's proposed action against the hub.

use std::sync::Arc;

use super::QueryResponse;
use crate::error::StoreError;
use crate::hub::{HubClient, ServiceOutcome};
use crate::memory::MemoryStore;
use crate::model::{ActionRequest, AssistantReply};

pub const DEFAULT_DOMAIN: &str = "input_boolean";
pub const DEFAULT_SERVICE: &str = "toggle";

/// Max characters of the hub's response body echoed back in `status`.
const STATUS_BODY_CHARS: usize = 200;

/// A fully specified service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub domain: String,
    pub service: String,
    pub entity_id: String,
}

impl From<ResolvedAction> for ActionRequest {
    fn from(action: ResolvedAction) -> Self {
        Self {
            domain: Some(action.domain),
            service: Some(action.service),
            entity_id: Some(action.entity_id),
        }
    }
}

/// Bare object ids (`lamp1`) are assumed to be input booleans.
pub fn normalize_entity_id(entity_id: &str) -> String {
    let entity_id = entity_id.trim();
    if entity_id.contains('.') {
        entity_id.to_string()
    } else {
        format!("{DEFAULT_DOMAIN}.{entity_id}")
    }
}

/// Fill in defaults; `None` if there is no target entity.
pub fn resolve(action: &ActionRequest) -> Option<ResolvedAction> {
    let entity_id = action.entity_id.as_deref()?;
    Some(ResolvedAction {
        domain: action.domain.clone().unwrap_or_else(|| DEFAULT_DOMAIN.into()),
        service: action.service.clone().unwrap_or_else(|| DEFAULT_SERVICE.into()),
        entity_id: normalize_entity_id(entity_id),
    })
}

pub fn status_line(outcome: &ServiceOutcome) -> String {
    let message: String = outcome.body.chars().take(STATUS_BODY_CHARS).collect();
    format!("Action result: {}, Message: {message}", outcome.status)
}

/// Run the reply's action, if any, and log what happened.
pub async fn execute(
    reply: AssistantReply,
    query: &str,
    hub: &HubClient,
    store: &Arc<MemoryStore>,
) -> Result<QueryResponse, StoreError> {
    let Some(action) = reply.action.as_ref().and_then(resolve) else {
        let event = format!("User asked: {query} - {}", reply.response);
        store.blocking(move |m| m.log_event(&event)).await?;
        return Ok(QueryResponse {
            response: reply.response,
            action: reply.action,
            status: Some("No action executed".into()),
        });
    };

    tracing::info!(
        domain = %action.domain,
        service = %action.service,
        entity_id = %action.entity_id,
        "executing action"
    );
    let outcome = hub
        .call_service(&action.domain, &action.service, &action.entity_id)
        .await;
    if !outcome.is_success() {
        tracing::warn!(status = outcome.status, entity_id = %action.entity_id, "hub rejected action");
    }

    let event = format!(
        "Executed {}.{} on {}",
        action.domain, action.service, action.entity_id
    );
    store.blocking(move |m| m.log_event(&event)).await?;

    Ok(QueryResponse {
        response: reply.response,
        action: Some(action.into()),
        status: Some(status_line(&outcome)),
    })
}

//! The query handler: shortcut matching, prompt construction, completion, and action
//! execution wired together in one pass.

pub mod action;
pub mod intent;
pub mod prompt;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::hub::HubClient;
use crate::memory::MemoryStore;
use crate::model::{self, ActionRequest, AssistantReply, Completion, CompletionProvider};
use intent::Intent;
use prompt::{PromptContext, RECENT_EVENT_LIMIT};

/// Body returned by `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    pub action: Option<ActionRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl QueryResponse {
    /// A text-only reply with no action and no status.
    pub fn reply(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            action: None,
            status: None,
        }
    }
}

pub struct Relay {
    memory: Arc<MemoryStore>,
    hub: HubClient,
    model: Arc<dyn CompletionProvider>,
    max_tokens: u32,
}

impl Relay {
    pub fn new(
        memory: MemoryStore,
        hub: HubClient,
        model: Arc<dyn CompletionProvider>,
        max_tokens: u32,
    ) -> Self {
        Self {
            memory: Arc::new(memory),
            hub,
            model,
            max_tokens,
        }
    }

    /// Build every collaborator from config.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let memory = MemoryStore::new(config.resolved_memory_path());
        let hub = HubClient::new(&config.hub).context("failed to build hub client")?;
        let provider = model::create_provider(&config.model).context("failed to build model provider")?;

        tracing::info!(
            memory = %memory.path().display(),
            hub = %hub.base_url(),
            provider = provider.name(),
            "relay ready"
        );

        Ok(Self::new(memory, hub, Arc::from(provider), config.model.max_tokens))
    }

    /// Answer one user query.
    ///
    /// Hub and model failures degrade into a reply; only memory write failures are
    /// returned as errors. Memory file access runs on the blocking pool.
    pub async fn handle_query(&self, query: &str) -> Result<QueryResponse, RelayError> {
        let query = query.trim();
        tracing::info!(query, "query received");

        if let Some(intent) = intent::match_intent(query) {
            tracing::debug!(?intent, "memory shortcut matched");
            let today = Local::now().date_naive();
            let event = format!("User requested memory action: {query}");
            let response = self
                .memory
                .blocking(move |m| {
                    let response = intent::answer_intent(&intent, m, today)?;
                    // A cleared store must stay empty.
                    if intent != Intent::ClearMemory {
                        m.log_event(&event)?;
                    }
                    Ok(response)
                })
                .await?;
            return Ok(response);
        }

        let devices = self.hub.fetch_devices().await;
        let doc = self.memory.blocking(|m| Ok(m.load())).await?;
        let pending = doc.pending_tasks();

        let prompt = prompt::compose_prompt(&PromptContext {
            now: Local::now(),
            recent_events: doc.recent_events(RECENT_EVENT_LIMIT),
            pending_tasks: &pending,
            devices: &devices,
            query,
        });

        let reply = match model::complete_reply(self.model.as_ref(), &prompt, self.max_tokens).await {
            Completion::Structured(reply) => reply,
            Completion::PlainText(text) => AssistantReply::text(text),
            Completion::Failed(error) => {
                return Ok(QueryResponse::reply(format!("LLM generation failed: {error}")));
            }
        };

        Ok(action::execute(reply, query, &self.hub, &self.memory).await?)
    }
}

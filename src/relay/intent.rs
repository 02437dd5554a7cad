//! Memory shortcuts answered without the language model.
//!
//! [`match_intent`] is a pure classifier over the query text; [`answer_intent`] reads
//! or mutates the memory store to produce the reply.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::QueryResponse;
use crate::error::StoreError;
use crate::memory::MemoryStore;

static REMEMBER_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)remember").expect("valid remember regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// "remember <note>": store the note as a task.
    Remember(String),
    /// "what did I do yesterday"
    Yesterday,
    /// Anything mentioning "tasks" or "to do".
    Tasks,
    /// "clear memory"
    ClearMemory,
}

/// Classify a query. Checks run in a fixed order and the first match wins.
pub fn match_intent(query: &str) -> Option<Intent> {
    let query = query.trim();
    let lower = query.to_lowercase();

    if lower.starts_with("remember ") {
        let note = REMEMBER_WORD.replace_all(query, "").trim().to_string();
        return Some(Intent::Remember(note));
    }
    if lower.contains("what did i do yesterday") {
        return Some(Intent::Yesterday);
    }
    if lower.contains("tasks") || lower.contains("to do") {
        return Some(Intent::Tasks);
    }
    if lower.contains("clear memory") {
        return Some(Intent::ClearMemory);
    }
    None
}

/// Drop a leading "to " (any case) so the reply does not read "remember to to ...".
fn strip_leading_to(note: &str) -> &str {
    match note.get(..3) {
        Some(head) if head.eq_ignore_ascii_case("to ") => note[3..].trim_start(),
        _ => note,
    }
}

pub fn answer_intent(
    intent: &Intent,
    store: &MemoryStore,
    today: NaiveDate,
) -> Result<QueryResponse, StoreError> {
    let response = match intent {
        Intent::Remember(note) => {
            store.add_task(note)?;
            let what = strip_leading_to(note);
            format!("Got it. I'll remember to {what}.")
        }
        Intent::Yesterday => {
            let events = today
                .pred_opt()
                .map(|yesterday| store.events_on(yesterday))
                .unwrap_or_default();
            if events.is_empty() {
                "Nothing notable was logged yesterday.".to_string()
            } else {
                format!("Yesterday you {}", events.join(", "))
            }
        }
        Intent::Tasks => {
            let tasks = store.pending_tasks();
            if tasks.is_empty() {
                "You have no pending tasks right now.".to_string()
            } else {
                let names: Vec<&str> = tasks.iter().map(|t| t.task.as_str()).collect();
                format!("You still need to: {}", names.join(", "))
            }
        }
        Intent::ClearMemory => {
            store.clear()?;
            "All memories have been cleared.".to_string()
        }
    };

    Ok(QueryResponse::reply(response))
}

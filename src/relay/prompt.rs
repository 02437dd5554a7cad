//! System prompt assembly.

use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::hub::DeviceState;
use crate::memory::{EventRecord, TaskRecord};

/// How many of the most recent events are shown to the model.
pub const RECENT_EVENT_LIMIT: usize = 10;

const PERSONA: &str = "You are 'Al', the local AI assistant that manages home devices \
and keeps track of what happens in the house.";

const TOOLS: &str = r#"Tools available: ["toggle_boolean", "call_service"]"#;

const REPLY_SCHEMA: &str = r#"Respond strictly in JSON format:
{
  "response": "Natural language reply to the user",
  "action": {
    "domain": "input_boolean" or null,
    "service": "toggle" or null,
    "entity_id": "entity.id" or null
  }
}
If no action is needed, set "action": null."#;

/// Everything the prompt is built from.
pub struct PromptContext<'a> {
    pub now: DateTime<Local>,
    pub recent_events: &'a [EventRecord],
    pub pending_tasks: &'a [TaskRecord],
    pub devices: &'a [DeviceState],
    pub query: &'a str,
}

/// e.g. `07:05 PM on Saturday June 15, 2024`
pub fn format_now(now: &DateTime<Local>) -> String {
    now.format("%I:%M %p on %A %B %d, %Y").to_string()
}

/// `<entity_id> '<name>' = <state>; area=<area>; <a1;a2;...>`
pub fn device_line(device: &DeviceState) -> String {
    format!(
        "{} '{}' = {}; area={}; {}",
        device.entity_id,
        device.name,
        device.state,
        device.area,
        device.attributes.join(";")
    )
}

pub fn compose_prompt(ctx: &PromptContext<'_>) -> String {
    let mut prompt = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "{PERSONA}");
    let _ = writeln!(prompt, "Current time: {}", format_now(&ctx.now));
    prompt.push('\n');

    if ctx.recent_events.is_empty() {
        prompt.push_str("No recent events recorded.\n");
    } else {
        prompt.push_str("Recent events:\n");
        for e in ctx.recent_events {
            let _ = writeln!(prompt, "- {} at {}", e.event, e.time);
        }
    }
    prompt.push('\n');

    if ctx.pending_tasks.is_empty() {
        prompt.push_str("No pending tasks.\n");
    } else {
        prompt.push_str("Pending tasks:\n");
        for t in ctx.pending_tasks {
            let _ = writeln!(prompt, "- {}", t.task);
        }
    }
    prompt.push('\n');

    let _ = writeln!(prompt, "{TOOLS}");
    prompt.push('\n');

    prompt.push_str("Devices:\n");
    for device in ctx.devices {
        let _ = writeln!(prompt, "{}", device_line(device));
    }
    prompt.push('\n');

    let _ = writeln!(prompt, "User request: {}", ctx.query);
    prompt.push('\n');
    let _ = writeln!(prompt, "{REPLY_SCHEMA}");

    prompt
}

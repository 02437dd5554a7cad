mod helpers;

use chrono::{Duration, Local, NaiveDateTime};
use helpers::{lamp_states, memory_in, relay, spawn_hub, unreachable_hub, ScriptedModel};
use homerelay::memory::{EventRecord, MemoryDocument};
use homerelay::memory::types::TIMESTAMP_FORMAT;
use tempfile::TempDir;

#[tokio::test]
async fn remember_adds_task_and_logs_shortcut() {
    let tmp = TempDir::new().unwrap();
    let model = ScriptedModel::new(vec![]);
    let relay = relay(&tmp, unreachable_hub(), model.clone());

    let reply = relay.handle_query("remember water the plants").await.unwrap();

    assert!(reply.response.contains("water the plants"));
    assert_eq!(reply.action, None);
    assert_eq!(reply.status, None);

    let doc = memory_in(&tmp).load();
    assert_eq!(doc.tasks.len(), 1);
    assert_eq!(doc.tasks[0].task, "water the plants");
    assert!(!doc.tasks[0].done);
    assert_eq!(doc.events.len(), 1);
    assert_eq!(doc.events[0].event, "User requested memory action: remember water the plants");
    assert!(model.prompts().is_empty(), "shortcuts must not reach the model");
}

#[tokio::test]
async fn clear_memory_leaves_store_empty() {
    let tmp = TempDir::new().unwrap();
    let relay = relay(&tmp, unreachable_hub(), ScriptedModel::new(vec![]));

    relay.handle_query("remember buy milk").await.unwrap();
    let reply = relay.handle_query("clear memory").await.unwrap();

    assert_eq!(reply.response, "All memories have been cleared.");
    assert_eq!(memory_in(&tmp).load(), MemoryDocument::default());
}

#[tokio::test]
async fn yesterday_reports_only_yesterdays_events() {
    let tmp = TempDir::new().unwrap();
    let now = Local::now();
    memory_in(&tmp)
        .save(&MemoryDocument {
            events: vec![
                EventRecord::new("watered the garden", &(now - Duration::days(1))),
                EventRecord::new("made breakfast", &now),
            ],
            tasks: vec![],
        })
        .unwrap();
    let relay = relay(&tmp, unreachable_hub(), ScriptedModel::new(vec![]));

    let reply = relay.handle_query("What did I do yesterday?").await.unwrap();

    assert_eq!(reply.response, "Yesterday you watered the garden");
}

#[tokio::test]
async fn action_is_normalized_and_executed() {
    let tmp = TempDir::new().unwrap();
    let hub = spawn_hub(lamp_states()).await;
    let model = ScriptedModel::new(vec![Ok(
        "```json\n{\"response\": \"Turning on the lamp.\", \"action\": {\"domain\": null, \"service\": null, \"entity_id\": \"lamp1\"}}\n```",
    )]);
    let relay = relay(&tmp, hub.client(), model.clone());

    let reply = relay.handle_query("turn on the bedroom lamp").await.unwrap();

    assert_eq!(reply.response, "Turning on the lamp.");
    let action = reply.action.unwrap();
    assert_eq!(action.entity_id.as_deref(), Some("input_boolean.lamp1"));
    assert_eq!(action.domain.as_deref(), Some("input_boolean"));
    assert_eq!(action.service.as_deref(), Some("toggle"));
    assert_eq!(reply.status.as_deref(), Some("Action result: 200, Message: []"));

    let calls = hub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].domain, "input_boolean");
    assert_eq!(calls[0].service, "toggle");
    assert_eq!(calls[0].body, serde_json::json!({"entity_id": "input_boolean.lamp1"}));

    let doc = memory_in(&tmp).load();
    assert_eq!(doc.events.len(), 1);
    assert_eq!(doc.events[0].event, "Executed input_boolean.toggle on input_boolean.lamp1");
}

#[tokio::test]
async fn prompt_carries_devices_events_and_tasks() {
    let tmp = TempDir::new().unwrap();
    let hub = spawn_hub(lamp_states()).await;
    let store = memory_in(&tmp);
    store.log_event("came home").unwrap();
    store.add_task("buy milk").unwrap();
    let model = ScriptedModel::new(vec![Ok(r#"{"response": "Hello!", "action": null}"#)]);
    let relay = relay(&tmp, hub.client(), model.clone());

    relay.handle_query("(Current room: Bedroom) hello").await.unwrap();

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("input_boolean.lamp1 'Bedroom Lamp' = off; area=Bedroom; "));
    assert!(prompt.contains("editable=true"));
    assert!(prompt.contains("friendly_name=Bedroom Lamp"));
    assert!(prompt.contains("input_boolean.fan 'unknown' = on; area=Unknown; "));
    assert!(prompt.contains("- came home at "));
    assert!(prompt.contains("- buy milk"));
    assert!(prompt.contains("User request: (Current room: Bedroom) hello"));
}

#[tokio::test]
async fn reply_without_action_is_logged() {
    let tmp = TempDir::new().unwrap();
    let hub = spawn_hub(lamp_states()).await;
    let model = ScriptedModel::new(vec![Ok(r#"{"response": "It is sunny.", "action": null}"#)]);
    let relay = relay(&tmp, hub.client(), model);

    let reply = relay.handle_query("how is the weather").await.unwrap();

    assert_eq!(reply.response, "It is sunny.");
    assert_eq!(reply.action, None);
    assert_eq!(reply.status.as_deref(), Some("No action executed"));
    assert!(hub.calls().is_empty());

    let doc = memory_in(&tmp).load();
    assert_eq!(doc.events[0].event, "User asked: how is the weather - It is sunny.");
}

#[tokio::test]
async fn prose_output_becomes_reply() {
    let tmp = TempDir::new().unwrap();
    let model = ScriptedModel::new(vec![Ok("I'm not sure what you mean.")]);
    let relay = relay(&tmp, unreachable_hub(), model);

    let reply = relay.handle_query("blorp").await.unwrap();

    assert_eq!(reply.response, "I'm not sure what you mean.");
    assert_eq!(reply.action, None);
    assert_eq!(reply.status.as_deref(), Some("No action executed"));
}

#[tokio::test]
async fn unreachable_hub_still_answers() {
    let tmp = TempDir::new().unwrap();
    let model = ScriptedModel::new(vec![Ok(r#"{"response": "Done.", "action": {"entity_id": "lamp1"}}"#)]);
    let relay = relay(&tmp, unreachable_hub(), model.clone());

    let reply = relay.handle_query("turn on the lamp").await.unwrap();

    assert!(model.prompts()[0].contains("Devices:\n\n"));
    let status = reply.status.unwrap();
    assert!(status.starts_with("Action result: 500, Message: Service call failed"), "{status}");
}

#[tokio::test]
async fn model_failure_is_reported_and_not_logged() {
    let tmp = TempDir::new().unwrap();
    let model = ScriptedModel::new(vec![Err("out of memory")]);
    let relay = relay(&tmp, unreachable_hub(), model);

    let reply = relay.handle_query("turn on the lamp").await.unwrap();

    assert!(reply.response.starts_with("LLM generation failed: "));
    assert!(reply.response.contains("out of memory"));
    assert_eq!(reply.action, None);
    assert_eq!(reply.status, None);
    assert_eq!(memory_in(&tmp).load(), MemoryDocument::default());
}

#[tokio::test]
async fn timestamps_use_local_iso_layout() {
    let tmp = TempDir::new().unwrap();
    let relay = relay(&tmp, unreachable_hub(), ScriptedModel::new(vec![]));

    relay.handle_query("remember take out the trash").await.unwrap();

    let doc = memory_in(&tmp).load();
    for stamp in [&doc.tasks[0].created, &doc.events[0].time] {
        assert!(
            NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok(),
            "unexpected timestamp layout: {stamp}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_queries_keep_every_task_and_event() {
    let tmp = TempDir::new().unwrap();
    let relay = std::sync::Arc::new(relay(&tmp, unreachable_hub(), ScriptedModel::new(vec![])));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let relay = std::sync::Arc::clone(&relay);
            tokio::spawn(async move { relay.handle_query(&format!("remember chore {i}")).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let doc = memory_in(&tmp).load();
    assert_eq!(doc.tasks.len(), 8);
    assert_eq!(doc.events.len(), 8);
    for i in 0..8 {
        assert!(doc.tasks.iter().any(|t| t.task == format!("chore {i}")));
    }
}

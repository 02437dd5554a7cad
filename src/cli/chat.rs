//! CLI `chat` and `ask` commands: send commands to a running relay.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use homerelay::config::ClientConfig;
use homerelay::relay::QueryResponse;

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "stop"];

fn is_exit(input: &str) -> bool {
    EXIT_WORDS.contains(&input.to_lowercase().as_str())
}

/// Prefix the command with the room it was spoken in, if known.
pub fn compose_query(command: &str, room: Option<&str>) -> String {
    match room.map(str::trim).filter(|r| !r.is_empty()) {
        Some(room) => format!("(Current room: {room}) {command}"),
        None => command.to_string(),
    }
}

struct RelayClient {
    client: reqwest::Client,
    query_url: String,
}

impl RelayClient {
    fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            query_url: format!("{}/query", config.server_url.trim_end_matches('/')),
        })
    }

    async fn send(&self, query: &str) -> Result<QueryResponse> {
        let response = self
            .client
            .post(&self.query_url)
            .json(&serde_json::json!({ "q": query }))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Send one query and print the reply; failures are printed, not returned.
    async fn send_and_print(&self, query: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner} thinking... {elapsed}")
                .expect("valid template"),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.send(query).await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => print_reply(&reply),
            Err(e) => println!("Failed to connect to LLM: {e:#}"),
        }
    }
}

fn print_reply(reply: &QueryResponse) {
    println!("\nAssistant: {}", reply.response);
    if let Some(action) = &reply.action {
        match serde_json::to_string(action) {
            Ok(json) => println!("Action: {json}"),
            Err(_) => println!("Action: {action:?}"),
        }
    }
    if let Some(status) = &reply.status {
        println!("Status: {status}");
    }
}

fn prompt_line(label: &str, input: &mut impl BufRead) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Interactive loop: ask for a room, then a command, and forward it to the relay.
pub async fn chat(config: &ClientConfig) -> Result<()> {
    let client = RelayClient::new(config)?;
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    println!("Home Assistant LLM Interface");
    println!("Enter the room name and your command below.");
    println!("Type 'exit' anytime to quit.\n");

    loop {
        let Some(room) = prompt_line("Room: ", &mut input)? else {
            break;
        };
        if is_exit(&room) {
            break;
        }

        let Some(command) = prompt_line("Command: ", &mut input)? else {
            break;
        };
        if is_exit(&command) {
            break;
        }
        if command.is_empty() {
            println!("Please enter a command.\n");
            continue;
        }

        client
            .send_and_print(&compose_query(&command, Some(&room)))
            .await;
        println!();
    }

    println!("Goodbye!");
    Ok(())
}

/// Send a single command and print the reply.
pub async fn ask(config: &ClientConfig, command: &str, room: Option<&str>) -> Result<()> {
    let client = RelayClient::new(config)?;
    client.send_and_print(&compose_query(command, room)).await;
    Ok(())
}

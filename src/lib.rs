//! Voice/text command relay for a home-automation hub.
//!
//! homerelay accepts a natural-language request, answers simple memory questions
//! directly, and otherwise asks a local language model for a reply and an optional
//! device action, which it then runs against the hub's REST API. Every interaction is
//! appended to a small JSON memory file.
//!
//! # Flow
//!
//! 1. [`relay::intent`] checks for memory shortcuts ("remember ...", "tasks", ...).
//! 2. [`hub`] fetches the device inventory and [`memory`] supplies recent context.
//! 3. [`relay::prompt`] builds the system prompt.
//! 4. [`model`] runs the completion and parses the structured reply.
//! 5. [`relay::action`] executes the proposed action and logs the outcome.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`error`]: Error types for the store, hub, model, and query boundaries
//! - [`hub`]: Home-automation hub REST client
//! - [`memory`]: JSON-file event log and task list
//! - [`model`]: Completion providers and reply parsing
//! - [`relay`]: The query handler

pub mod config;
pub mod error;
pub mod hub;
pub mod memory;
pub mod model;
pub mod relay;

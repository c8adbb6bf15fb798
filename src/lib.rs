//! kubemate: a natural-language kubectl assistant for the terminal.
//!
//! The operator types requests in plain language; an agent session backed by
//! an OpenAI-compatible model turns them into kubectl invocations, looks up
//! the Kubernetes documentation, and asks for confirmation before anything
//! destructive runs.
//!
//! # Layout
//!
//! - [`app`]: orchestrator tying input, session, timeline and confirmations
//! - [`agent`]: session backend traits, event stream, lifecycle manager
//! - [`tools`]: the tools the agent can call
//! - [`kubectl`], [`docs`]: the cluster CLI and documentation clients
//! - [`confirm`], [`risk`]: destructive-command gating
//! - [`timeline`], [`ui`]: what the operator sees

pub mod agent;
pub mod api;
pub mod app;
pub mod config;
pub mod confirm;
pub mod docs;
pub mod error;
pub mod kubectl;
pub mod prompt;
pub mod risk;
#[cfg(test)]
pub mod testsupport;
pub mod textutil;
pub mod timeline;
pub mod tools;
pub mod types;
pub mod ui;

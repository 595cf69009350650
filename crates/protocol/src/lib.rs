//! # dh-protocol
//!
//! Wire models shared between the dlhub server and its web UI.
//!
//! This crate defines all data structures that cross the HTTP boundary:
//! - Tracked command snapshots and their status
//! - Download-directory file listings
//! - Request and response bodies of the JSON API
//! - The `dlhub.toml` configuration model
//!
//! ## Modules
//!
//! - [`command_models`]: Command status and registry snapshots
//! - [`file_models`]: File listing entries
//! - [`api`]: Request/response envelopes and SSE payloads
//! - [`config_models`]: Server configuration from `dlhub.toml`
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs and chrono
//! - TypeScript generation: All types derive `TS` for the web client
//! - Independent compilation: No dependencies on other dlhub crates

pub mod api;
pub mod command_models;
pub mod config_models;
pub mod file_models;

// Re-export all public types for convenience
pub use api::*;
pub use command_models::*;
pub use config_models::*;
pub use file_models::*;

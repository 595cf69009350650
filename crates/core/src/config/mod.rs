//! Configuration loading and management.
//!
//! This module reads `dlhub.toml`, layers environment and command-line
//! overrides on top and prepares the download directory.

pub mod error;
pub mod loader;
pub mod models;

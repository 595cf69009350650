//! # dh-core
//!
//! Process execution and command tracking for dlhub.
//!
//! This crate provides:
//! - A process runner that captures output and replays it to any number of
//!   subscribers
//! - A command registry broadcasting state snapshots
//! - Download and audio extraction dispatch
//! - Access to the download directory
//! - Configuration loading from `dlhub.toml`
//!
//! ## Modules
//!
//! - [`runner`]: Process execution and output broadcast
//! - [`registry`]: Command tracking
//! - [`jobs`]: Download and extraction dispatch
//! - [`files`]: Download directory access
//! - [`config`]: Configuration loading and management

pub mod config;
pub mod files;
pub mod jobs;
pub mod registry;
pub mod runner;

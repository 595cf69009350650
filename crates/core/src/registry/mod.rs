//! Registry of launched commands.
//!
//! This module provides:
//! - [`CommandRegistry`]: identifier allocation, status tracking and
//!   snapshot broadcast
//! - [`CommandEntry`] / [`CommandId`]: the records it owns

pub mod entry;
pub mod error;
pub mod manager;

pub use entry::{CommandEntry, CommandId};
pub use error::{RegistryError, RegistryResult};
pub use manager::{CommandRegistry, RegistrySubscription, SubscriptionId};

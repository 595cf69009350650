//! Error types for the command registry.

use thiserror::Error;

/// Errors returned by [`CommandRegistry`](super::CommandRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No command with this identifier was ever registered.
    #[error("Command {0} not found")]
    NotFound(String),
}

/// Type alias for Result with RegistryError.
pub type RegistryResult<T> = Result<T, RegistryError>;

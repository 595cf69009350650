//! Common test utilities shared by the integration tests.
//!
//! This module provides:
//! - Runner and dispatcher fixtures
//! - Helpers that wait for asynchronous outcomes with a timeout

pub mod fixtures;
pub mod waiting;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use waiting::*;

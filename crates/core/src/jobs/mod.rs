//! Job dispatch: the launch, register and watch sequence for downloads and
//! audio extraction.

pub mod dispatcher;
pub mod error;
pub mod watcher;

pub use dispatcher::{Dispatcher, ExtractOutcome};
pub use error::{JobError, JobResult};
pub use watcher::spawn_watcher;

//! Launch, register and watch download and extraction commands.

use crate::files::{FileError, FileStore};
use crate::jobs::error::{JobError, JobResult};
use crate::jobs::watcher::spawn_watcher;
use crate::registry::{CommandId, CommandRegistry};
use crate::runner::{ProcessRunner, RunnerOptions};
use dh_protocol::config_models::ToolsConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Result of an audio extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The target already exists; nothing was launched.
    Exists { filename: String, size: u64 },

    /// Extraction is running under this command.
    Started(CommandId),
}

/// Entry point for starting commands.
///
/// Every command runs with the download directory as its working directory,
/// is registered in the shared registry and gets a watcher that records its
/// outcome.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    files: FileStore,
    tools: ToolsConfig,
    options: RunnerOptions,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        files: FileStore,
        tools: ToolsConfig,
        options: RunnerOptions,
    ) -> Self {
        Self {
            registry,
            files,
            tools,
            options,
        }
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// Download `url` with the configured download tool.
    ///
    /// The URL is passed after `--`, so it is always positional.
    ///
    /// # Errors
    ///
    /// - `JobError::InvalidRequest` if `url` is blank
    /// - `JobError::Launch` if the tool cannot be started
    pub async fn start_download(&self, url: &str) -> JobResult<CommandId> {
        let url = url.trim();
        if url.is_empty() {
            return Err(JobError::InvalidRequest("URL is required".to_string()));
        }

        let args = vec![
            "-f".to_string(),
            self.tools.yt_dlp_format.clone(),
            // A URL starting with `-` must not be parsed as an option.
            "--".to_string(),
            url.to_string(),
        ];
        self.launch(&self.tools.yt_dlp, args, url).await
    }

    /// Extract the audio track of a downloaded file into an `.mp3` next to it.
    ///
    /// # Errors
    ///
    /// - `JobError::File` if `name` is not a valid relative name
    /// - `JobError::SourceNotFound` if the source file does not exist
    /// - `JobError::Launch` if the tool cannot be started
    pub async fn extract_audio(&self, name: &str) -> JobResult<ExtractOutcome> {
        let source = self.files.existing(name).map_err(|e| match e {
            FileError::NotFound(name) => JobError::SourceNotFound(name),
            other => JobError::File(other),
        })?;

        let filename = audio_target_name(name);
        let target = self.files.resolve(&filename)?;

        if target.is_file() {
            let info = self.files.metadata(&filename)?;
            info!(filename = %filename, "audio file already exists");
            return Ok(ExtractOutcome::Exists {
                filename,
                size: info.size,
            });
        }

        let args = vec![
            "-i".to_string(),
            source.to_string_lossy().into_owned(),
            "-vn".to_string(),
            "-acodec".to_string(),
            "libmp3lame".to_string(),
            "-q:a".to_string(),
            "2".to_string(),
            target.to_string_lossy().into_owned(),
            "-y".to_string(),
        ];
        let label = format!("Extract audio: {}", name.trim_start_matches('/'));
        let id = self.launch(&self.tools.ffmpeg, args, &label).await?;
        Ok(ExtractOutcome::Started(id))
    }

    async fn launch(&self, program: &str, args: Vec<String>, label: &str) -> JobResult<CommandId> {
        let runner = Arc::new(ProcessRunner::new_with_options(
            program,
            args,
            self.files.root(),
            self.options,
        ));
        runner.start().await?;

        let id = self.registry.register(Arc::clone(&runner), label);
        spawn_watcher(Arc::clone(&self.registry), id, runner);

        info!(command_id = %id, program = %program, label = %label, "command dispatched");
        Ok(id)
    }
}

/// Same relative name with the extension replaced by `.mp3`.
fn audio_target_name(name: &str) -> String {
    Path::new(name.trim_start_matches('/'))
        .with_extension("mp3")
        .to_string_lossy()
        .into_owned()
}

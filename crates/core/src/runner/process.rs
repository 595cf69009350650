//! The process runner: one external process and its broadcast output.

use crate::runner::error::{RunnerError, RunnerResult};
use crate::runner::lines::{LineReader, ReadLine};
use crate::runner::output::OutputLog;
use crate::runner::RunnerOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch, Mutex};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

/// Exit code reported before the process has been reaped.
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Exit code reported when the OS gives no numeric status
/// (termination by signal, failed wait).
pub const ABNORMAL_EXIT_CODE: i32 = 1;

/// Coarse lifecycle of a [`ProcessRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    NotStarted,
    /// Spawned; the process may have exited but has not been reaped and
    /// drained yet.
    Running,
    Finished(i32),
}

/// Owns a single external process invocation.
///
/// Output from stdout and stderr is captured line by line into a shared
/// history. Any number of subscribers can attach at any point and each one
/// receives the whole history followed by live lines. Live delivery never
/// blocks: a subscriber whose buffer is full simply misses lines, so the
/// pipes are always drained.
///
/// # Example
///
/// ```rust,no_run
/// use dh_core::runner::ProcessRunner;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = ProcessRunner::new("echo", ["hello"], "/tmp");
/// let mut logs = runner.subscribe_output();
/// runner.start().await?;
///
/// while let Some(line) = logs.recv().await {
///     println!("{}", line);
/// }
/// runner.wait().await?;
/// assert_eq!(runner.exit_code(), 0);
/// # Ok(())
/// # }
/// ```
pub struct ProcessRunner {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
    options: RunnerOptions,
    output: Arc<OutputLog>,
    /// Held across `spawn` and `wait` so both are serialized.
    child: Mutex<Option<Child>>,
    started: AtomicBool,
    finished: AtomicBool,
    exit_code: AtomicI32,
    drained: Arc<watch::Sender<bool>>,
}

impl ProcessRunner {
    /// Create a runner in the not-started state with default capture
    /// options.
    ///
    /// # Arguments
    ///
    /// * `program` - Executable name (looked up on `PATH`) or path
    /// * `args` - Arguments passed verbatim, without shell interpretation
    /// * `working_dir` - Directory the process runs in
    pub fn new<I, S>(program: impl Into<String>, args: I, working_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new_with_options(program, args, working_dir, RunnerOptions::default())
    }

    /// Like [`new`](Self::new), with explicit line length and subscriber
    /// buffer limits.
    pub fn new_with_options<I, S>(
        program: impl Into<String>,
        args: I,
        working_dir: impl Into<PathBuf>,
        options: RunnerOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (drained, _) = watch::channel(false);

        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
            options,
            output: Arc::new(OutputLog::new(options.subscriber_slack)),
            child: Mutex::new(None),
            started: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            exit_code: AtomicI32::new(UNKNOWN_EXIT_CODE),
            drained: Arc::new(drained),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Launch the process and its two output readers.
    ///
    /// Calling this on a runner that is already started is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Launch` if the pipes cannot be created or the
    /// process cannot be spawned. The runner stays not-started.
    pub async fn start(&self) -> RunnerResult<()> {
        // `wait()` holds the child lock until exit, so check before locking.
        if self.started.load(Ordering::Acquire) {
            return Ok(());
        }

        let mut slot = self.child.lock().await;
        if self.started.load(Ordering::Acquire) {
            return Ok(());
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| RunnerError::Launch {
            program: self.program.clone(),
            source,
        })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                let _ = child.start_kill();
                return Err(RunnerError::Launch {
                    program: self.program.clone(),
                    source: std::io::Error::other("output pipes were not created"),
                });
            }
        };

        info!(
            program = %self.program,
            pid = ?child.id(),
            cwd = %self.working_dir.display(),
            "process started"
        );

        let max = self.options.max_line_bytes;
        let out_task = tokio::spawn(capture(stdout, Arc::clone(&self.output), max, "stdout"));
        let err_task = tokio::spawn(capture(stderr, Arc::clone(&self.output), max, "stderr"));

        let output = Arc::clone(&self.output);
        let drained = Arc::clone(&self.drained);
        let program = self.program.clone();
        tokio::spawn(async move {
            let (out_res, err_res) = tokio::join!(out_task, err_task);
            for res in [out_res, err_res] {
                if let Err(e) = res {
                    warn!(program = %program, error = %e, "output reader task failed");
                }
            }
            output.close();
            drained.send_replace(true);
            debug!(program = %program, "output drained");
        });

        *slot = Some(child);
        self.started.store(true, Ordering::Release);
        Ok(())
    }

    /// Subscribe to the output.
    ///
    /// The receiver first yields every line captured so far, then live lines,
    /// and returns `None` once the process has finished and its output has
    /// been drained. Subscribing after completion yields the full history
    /// followed immediately by `None`.
    pub fn subscribe_output(&self) -> mpsc::Receiver<String> {
        self.output.subscribe()
    }

    /// [`subscribe_output`](Self::subscribe_output) as a `Stream`.
    pub fn output_stream(&self) -> ReceiverStream<String> {
        ReceiverStream::new(self.subscribe_output())
    }

    /// Wait until the process has exited and both pipes are drained.
    ///
    /// Resolves [`exit_code`](Self::exit_code) as a side effect. Returns
    /// immediately on a runner that was never started.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Wait` if the OS wait fails; the exit code is then
    /// recorded as [`ABNORMAL_EXIT_CODE`]. A nonzero exit is not an error.
    pub async fn wait(&self) -> RunnerResult<()> {
        let mut slot = self.child.lock().await;
        let Some(child) = slot.as_mut() else {
            // Never started, or an earlier call already reaped it.
            return Ok(());
        };

        let status = child.wait().await;
        self.wait_drained().await;
        *slot = None;

        let result = match status {
            Ok(status) => {
                let code = status.code().unwrap_or(ABNORMAL_EXIT_CODE);
                info!(program = %self.program, exit_code = code, "process finished");
                self.exit_code.store(code, Ordering::Release);
                Ok(())
            }
            Err(source) => {
                warn!(program = %self.program, error = %source, "waiting for process failed");
                self.exit_code.store(ABNORMAL_EXIT_CODE, Ordering::Release);
                Err(RunnerError::Wait {
                    program: self.program.clone(),
                    source,
                })
            }
        };
        self.finished.store(true, Ordering::Release);
        result
    }

    async fn wait_drained(&self) {
        let mut rx = self.drained.subscribe();
        // The sender lives as long as `self`, so this only ends on `true`.
        let _ = rx.wait_for(|drained| *drained).await;
    }

    /// Exit code, or [`UNKNOWN_EXIT_CODE`] until [`wait`](Self::wait) resolved.
    pub fn exit_code(&self) -> i32 {
        self.exit_code.load(Ordering::Acquire)
    }

    /// Copy of every line captured so far.
    pub fn snapshot_logs(&self) -> Vec<String> {
        self.output.snapshot()
    }

    pub fn state(&self) -> RunnerState {
        if self.finished.load(Ordering::Acquire) {
            RunnerState::Finished(self.exit_code())
        } else if self.started.load(Ordering::Acquire) {
            RunnerState::Running
        } else {
            RunnerState::NotStarted
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Number of live output subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.output.subscriber_count()
    }
}

impl std::fmt::Debug for ProcessRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRunner")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("working_dir", &self.working_dir)
            .field("state", &self.state())
            .finish()
    }
}

/// Drain one pipe into the output log.
async fn capture<R>(stream: R, output: Arc<OutputLog>, max_line_bytes: usize, name: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut lines = LineReader::new(stream, max_line_bytes);
    loop {
        match lines.next_line().await {
            Ok(Some(ReadLine::Line(line))) => output.push(line),
            Ok(Some(ReadLine::TooLong)) => {
                warn!(stream = name, max_line_bytes, "discarding oversized output line");
                output.push(format!(
                    "Error reading output: line exceeds {} bytes",
                    max_line_bytes
                ));
            }
            Ok(None) => break,
            Err(e) => {
                warn!(stream = name, error = %e, "failed to read process output");
                output.push(format!("Error reading output: {}", e));
                break;
            }
        }
    }
}

//! Output history and subscriber fan-out for a single process.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Append-only line history plus the set of live subscribers.
///
/// History and subscribers share one lock, so a subscriber registered in
/// [`OutputLog::subscribe`] sees every line exactly once: either in the
/// replay or as a live send, never both.
pub(crate) struct OutputLog {
    inner: Mutex<Inner>,
    slack: usize,
}

struct Inner {
    lines: Vec<String>,
    subscribers: Vec<mpsc::Sender<String>>,
    closed: bool,
}

impl OutputLog {
    /// `slack` is the live-line capacity each subscriber gets on top of
    /// the replayed history.
    pub(crate) fn new(slack: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lines: Vec::new(),
                subscribers: Vec::new(),
                closed: false,
            }),
            slack: slack.max(1),
        }
    }

    /// Append a line and offer it to every subscriber without blocking.
    ///
    /// A subscriber whose buffer is full misses this line. Subscribers whose
    /// receiver has been dropped are removed.
    pub(crate) fn push(&self, line: String) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }

        inner.subscribers.retain(|tx| match tx.try_send(line.clone()) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Closed(_)) => false,
        });
        inner.lines.push(line);
    }

    /// Create a receiver pre-seeded with the full history.
    ///
    /// If the log is already closed the sender is dropped right away, so the
    /// receiver yields the history and then `None`.
    pub(crate) fn subscribe(&self) -> mpsc::Receiver<String> {
        let mut inner = self.inner.lock();
        let (tx, rx) = mpsc::channel(inner.lines.len() + self.slack);

        for line in &inner.lines {
            // Capacity covers the whole history, so this never hits Full.
            if tx.try_send(line.clone()).is_err() {
                break;
            }
        }

        if !inner.closed {
            inner.subscribers.push(tx);
        }
        rx
    }

    /// Freeze the history and close every subscriber channel.
    pub(crate) fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        inner.subscribers.clear();
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.inner.lock().lines.clone()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

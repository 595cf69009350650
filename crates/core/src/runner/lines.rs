//! Bounded line splitting for child output pipes.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

/// One item produced by [`LineReader::next_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReadLine {
    /// A complete line with its terminator stripped.
    Line(String),
    /// A line longer than the limit; its bytes were discarded.
    TooLong,
}

/// Splits a byte stream into lines of at most `max_len` bytes.
///
/// Unlike `Lines` from tokio, an oversized line does not end the stream:
/// the reader skips to the next newline and carries on, so the pipe keeps
/// being drained.
pub(crate) struct LineReader<R> {
    reader: BufReader<R>,
    max_len: usize,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub(crate) fn new(inner: R, max_len: usize) -> Self {
        Self {
            reader: BufReader::new(inner),
            max_len: max_len.max(1),
            buf: Vec::new(),
        }
    }

    /// Read the next line, or `None` once the writer closed the pipe.
    pub(crate) async fn next_line(&mut self) -> std::io::Result<Option<ReadLine>> {
        self.buf.clear();

        // One extra byte leaves room for the newline of a maximum-length line.
        let limit = self.max_len as u64 + 1;
        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .await?;

        if n == 0 {
            return Ok(None);
        }

        if self.buf.last() != Some(&b'\n') && n as u64 == limit {
            self.skip_rest_of_line(limit).await?;
            return Ok(Some(ReadLine::TooLong));
        }

        Ok(Some(ReadLine::Line(decode_line(&self.buf))))
    }

    async fn skip_rest_of_line(&mut self, limit: u64) -> std::io::Result<()> {
        loop {
            self.buf.clear();
            let n = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut self.buf)
                .await?;
            if n == 0 || self.buf.last() == Some(&b'\n') {
                return Ok(());
            }
        }
    }
}

/// Strip `\n` / `\r\n` and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

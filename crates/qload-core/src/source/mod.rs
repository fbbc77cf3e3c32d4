use std::borrow::Cow;

use async_trait::async_trait;
use qload_model::{Message, SequenceNumber};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

/// Inbound side of a queue transport.
///
/// Returns `None` once the source is exhausted. Implementations must be cancel-safe:
/// the dispatcher may drop a pending `receive` on shutdown.
#[async_trait]
pub trait MessageSource: Send {
    async fn receive(&mut self) -> Option<Message>;
}

/// Source that turns each non-blank line of a reader into a message.
///
/// The line terminator (`\n` or `\r\n`) is stripped; the rest of the line is the body as-is.
/// Invalid UTF-8 is decoded lossily so one bad line never stops intake.
/// Sequence numbers start at 1 and increase per emitted message.
pub struct LineSource<R> {
    reader: R,
    /// Bytes of the line being read; kept across a dropped `receive` so no input is lost.
    buf: Vec<u8>,
    next_seq: SequenceNumber,
}

impl<R> LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            next_seq: 1,
        }
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[async_trait]
impl<R> MessageSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn receive(&mut self) -> Option<Message> {
        loop {
            match self.reader.read_until(b'\n', &mut self.buf).await {
                Ok(0) if self.buf.is_empty() => return None,
                Ok(_) => {
                    let decoded = String::from_utf8_lossy(&self.buf);
                    let body = strip_terminator(&decoded);
                    if body.trim().is_empty() {
                        self.buf.clear();
                        continue;
                    }
                    let seq = self.next_seq;
                    if let Cow::Owned(_) = decoded {
                        warn!(target: "qload.core.source", seq, "line is not valid UTF-8; decoded lossily");
                    }
                    let message = Message::new(seq, body);
                    self.next_seq += 1;
                    self.buf.clear();
                    return Some(message);
                }
                Err(e) => {
                    warn!(target: "qload.core.source", error = %e, "read failed; closing source");
                    return None;
                }
            }
        }
    }
}

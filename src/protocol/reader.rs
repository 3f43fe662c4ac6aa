//! Incremental message reader
//!
//! A [`Reader`] scans whole segments out of a byte buffer. When the buffer
//! ends in the middle of a segment the reader hands itself back together with
//! the unconsumed tail:
//!
//! ```text
//! read(buf) ──┬─> Complete(message)          buffer ended on a terminator
//!             ├─> Incomplete(reader, tail)   append bytes to tail, read again
//!             └─> Err(error)                 malformed input, not retried
//! ```
//!
//! `read` takes the reader by value, so a continuation can only be resumed
//! once.
//!
//! A buffer ending exactly on a terminator completes the message. Callers that
//! receive one message split across segment-aligned chunks keep appending with
//! [`Reader::resume`]; framing several messages in one stream is the caller's
//! job.

use bytes::Bytes;
use tracing::{debug, instrument, trace};

use super::metrics::Metrics;
use super::{
    Error, Format, Message, ReadOptions, Result, SEGMENT_ID_LEN, Segment, SegmentId, Separators,
};

/// Scanning phase of a [`Reader`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReaderState {
    /// Waiting for the header segment that declares separators
    #[default]
    ScanningHeader,
    /// Header seen; remaining segments use these separators
    ScanningSegments(Separators),
}

/// Result of a [`Reader::read`] call
#[derive(Debug)]
pub enum ReadOutcome {
    /// Buffer ended exactly on a segment terminator
    Complete(Message),
    /// Buffer ended mid-segment: resume the reader with the tail plus more bytes
    Incomplete(Reader, Bytes),
}

impl ReadOutcome {
    /// Completed message, if any
    #[must_use]
    pub fn complete(self) -> Option<Message> {
        match self {
            Self::Complete(message) => Some(message),
            Self::Incomplete(..) => None,
        }
    }

    /// Whether reading finished
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Resumable parser state: learned separators plus segments parsed so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reader {
    options: ReadOptions,
    state: ReaderState,
    segments: Vec<Segment>,
}

impl Reader {
    /// Fresh reader expecting a header segment
    #[must_use]
    pub fn new(options: ReadOptions) -> Self {
        Self {
            options,
            state: ReaderState::ScanningHeader,
            segments: Vec::new(),
        }
    }

    /// Continue a message that a previous read already completed.
    ///
    /// The separators come from the message's leading header; a message
    /// without one resumes as a fresh reader expecting a header.
    #[must_use]
    pub fn resume(options: ReadOptions, message: Message) -> Self {
        let state = message
            .declared_separators()
            .map_or(ReaderState::ScanningHeader, ReaderState::ScanningSegments);
        Self {
            options,
            state,
            segments: message.into_segments(),
        }
    }

    /// Current scanning phase
    #[must_use]
    pub const fn state(&self) -> &ReaderState {
        &self.state
    }

    /// Separators learned from the header, once seen
    #[must_use]
    pub const fn separators(&self) -> Option<Separators> {
        match self.state {
            ReaderState::ScanningHeader => None,
            ReaderState::ScanningSegments(separators) => Some(separators),
        }
    }

    /// Segments parsed so far
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Options this reader was created with
    #[must_use]
    pub const fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Consume every terminated segment in `buffer`.
    ///
    /// Returns [`ReadOutcome::Incomplete`] with the unterminated tail when
    /// `buffer` does not end on a terminator.
    #[instrument(level = "debug", skip(self, buffer), fields(len = buffer.len()))]
    pub fn read(mut self, buffer: &[u8]) -> Result<ReadOutcome> {
        let terminator = self.options.input_format.terminator();
        let mut cursor = 0;

        while let Some(offset) = buffer[cursor..].iter().position(|&b| b == terminator) {
            let line = &buffer[cursor..cursor + offset];
            cursor += offset + 1;
            self.consume_line(line).inspect_err(Self::record_failure)?;
        }

        let tail = &buffer[cursor..];
        if self.strip_line(tail).is_empty() {
            return Ok(ReadOutcome::Complete(self.complete()));
        }

        debug!(
            segments = self.segments.len(),
            pending = tail.len(),
            "incomplete segment, awaiting more input"
        );
        Metrics::record_incomplete();
        Ok(ReadOutcome::Incomplete(self, Bytes::copy_from_slice(tail)))
    }

    /// End of input: parse `tail` as a final segment even though it lacks a
    /// terminator, and return the message.
    #[instrument(level = "debug", skip(self, tail), fields(len = tail.len()))]
    pub fn finish(mut self, tail: &[u8]) -> Result<Message> {
        self.consume_line(tail).inspect_err(Self::record_failure)?;
        Ok(self.complete())
    }

    fn consume_line(&mut self, line: &[u8]) -> Result<()> {
        let line = self.strip_line(line);
        if line.is_empty() {
            return Ok(());
        }

        let index = self.segments.len();
        let text =
            std::str::from_utf8(line).map_err(|source| Error::InvalidUtf8 { index, source })?;

        let mut segment = match self.state {
            ReaderState::ScanningHeader => {
                let (segment, separators) = Segment::parse_header(text, index)?;
                debug!(%separators, id = %segment.id(), "header parsed");
                self.state = ReaderState::ScanningSegments(separators);
                segment
            }
            ReaderState::ScanningSegments(separators) => {
                if starts_with_header(text) {
                    Segment::parse_header(text, index)?.0
                } else {
                    Segment::parse(text, &separators, index)?
                }
            }
        };

        if !self.options.accepts(&segment.id()) {
            return Err(Error::UnknownSegment {
                id: segment.id().to_string(),
                index,
            });
        }
        if self.options.trim {
            segment.trim();
        }

        trace!(index, id = %segment.id(), fields = segment.field_count(), "segment parsed");
        Metrics::record_segment();
        self.segments.push(segment);
        Ok(())
    }

    /// Drop line-break noise around a segment: the `\r` of a `\r\n` pair in
    /// text input, a stray `\n` after `\r` in wire input.
    fn strip_line<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        match self.options.input_format {
            Format::Text => line.strip_suffix(b"\r").unwrap_or(line),
            Format::Wire => line.strip_prefix(b"\n").unwrap_or(line),
        }
    }

    fn complete(self) -> Message {
        debug!(segments = self.segments.len(), "message complete");
        Metrics::record_read();
        Message::from_segments(self.segments)
    }

    fn record_failure(error: &Error) {
        debug!(%error, "read failed");
        Metrics::record_error();
    }
}

/// `MSH|...` but not `MSHA|...`: the ID must end where the field separator
/// begins.
fn starts_with_header(text: &str) -> bool {
    text.get(..SEGMENT_ID_LEN)
        .and_then(SegmentId::new)
        .is_some_and(|id| id.is_header())
        && !text[SEGMENT_ID_LEN..].starts_with(|c: char| c.is_ascii_alphanumeric())
}

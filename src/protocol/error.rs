//! HL7 error types

use thiserror::Error;

/// HL7 codec errors
///
/// Running out of input is not an error: the reader reports it as
/// [`ReadOutcome::Incomplete`](super::ReadOutcome::Incomplete).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Separator set is malformed
    #[error("invalid separators {spec:?}: {reason}")]
    InvalidSeparators {
        /// Offending specification, as given
        spec: String,
        /// What made it invalid
        reason: &'static str,
    },

    /// Segment could not be parsed
    #[error("malformed segment at index {index}: {reason}")]
    MalformedSegment {
        /// Position of the segment within the message
        index: usize,
        /// What made it malformed
        reason: String,
    },

    /// Segment ID not among the known IDs (strict mode only)
    #[error("unknown segment {id} at index {index}")]
    UnknownSegment {
        /// Segment ID found
        id: String,
        /// Position of the segment within the message
        index: usize,
    },

    /// Segment text is not valid UTF-8
    #[error("invalid UTF-8 in segment at index {index}: {source}")]
    InvalidUtf8 {
        /// Position of the segment within the message
        index: usize,
        /// Underlying decode error
        #[source]
        source: std::str::Utf8Error,
    },

    /// Anchor segment for an insertion does not exist
    #[error("segment {id} repetition {repetition} not found")]
    SegmentNotFound {
        /// Segment ID searched for
        id: String,
        /// 0-based repetition searched for
        repetition: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

//! Input/output formats and codec options

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{SEGMENT_TERMINATOR, SegmentId, Separators, TEXT_TERMINATOR};

/// Segment terminator style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Format {
    /// Segments end with a carriage return
    #[default]
    Wire,
    /// Segments end with a line feed (console and log rendering)
    Text,
}

impl Format {
    /// Terminator byte
    #[must_use]
    pub const fn terminator(self) -> u8 {
        match self {
            Self::Wire => SEGMENT_TERMINATOR,
            Self::Text => TEXT_TERMINATOR,
        }
    }

    /// Name as used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wire => "wire",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized format name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format {0:?}, expected \"wire\" or \"text\"")]
pub struct ParseFormatError(String);

impl FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wire" => Ok(Self::Wire),
            "text" => Ok(Self::Text),
            other => Err(ParseFormatError(other.to_owned())),
        }
    }
}

/// Reader configuration
///
/// Separators, the escape character included, are learned from the header
/// segment of each message and are not configured here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadOptions {
    /// Terminator expected between segments
    pub input_format: Format,
    /// Trim trailing empty items from every parsed segment
    pub trim: bool,
    /// When set, segment IDs outside this set are rejected
    pub known_segments: Option<BTreeSet<SegmentId>>,
}

impl ReadOptions {
    /// Reject segments whose ID is not in `ids`
    #[must_use]
    pub fn strict(mut self, ids: impl IntoIterator<Item = SegmentId>) -> Self {
        self.known_segments = Some(ids.into_iter().collect());
        self
    }

    /// Whether `id` may appear in a message read with these options
    #[must_use]
    pub fn accepts(&self, id: &SegmentId) -> bool {
        self.known_segments
            .as_ref()
            .is_none_or(|known| known.contains(id))
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            input_format: Format::Wire,
            trim: true,
            known_segments: None,
        }
    }
}

/// Writer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteOptions {
    /// Terminator written after each segment
    pub output_format: Format,
    /// Trim trailing empty items before joining
    pub trim: bool,
    /// Separators used for output, also declared in header segments.
    ///
    /// To write with a different escape character only, use
    /// `Separators::DEFAULT.with_escape(c)`.
    pub separators: Separators,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            output_format: Format::Wire,
            trim: true,
            separators: Separators::DEFAULT,
        }
    }
}

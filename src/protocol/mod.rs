//! HL7 v2 core implementation
//!
//! This module provides the separator table, escaping, the segment model,
//! the incremental reader and the writer.

mod codec;
mod error;
mod escape;
mod field;
mod header;
pub mod metrics;
mod message;
mod reader;
mod segment;
mod separators;
mod types;

pub use codec::{read, read_to_end, write, write_chunks};
pub use error::{Error, Result};
pub use escape::{escape, unescape};
pub use field::{Component, Field, Repetition};
pub use header::{DEFAULT_PROCESSING_ID, DEFAULT_VERSION, HeaderBuilder, generate_control_id};
pub use message::Message;
pub use metrics::{MetricsSnapshot, snapshot as metrics_snapshot};
pub use reader::{ReadOutcome, Reader, ReaderState};
pub use segment::{InvalidSegmentId, Segment, SegmentId};
pub use separators::Separators;
pub use types::{Format, ParseFormatError, ReadOptions, WriteOptions};

/// Segment terminator in wire format
pub const SEGMENT_TERMINATOR: u8 = b'\r';

/// Segment terminator in text format
pub const TEXT_TERMINATOR: u8 = b'\n';

/// Length of a segment identifier
pub const SEGMENT_ID_LEN: usize = 3;

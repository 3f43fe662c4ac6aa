//! HL7 v2 message codec with an incremental reader and segment-level editing
//!
//! This library parses and serializes HL7 v2 messages: `\r`-terminated
//! segments whose fields are split into repetitions, components and
//! subcomponents by separators declared in the message header.
//!
//! # Quick Start
//!
//! ```rust
//! use hl7v2::{Message, ReadOptions, WriteOptions, read_to_end, write};
//!
//! let bytes = b"MSH|^~\\&|LAB|HOSP|||||ORU^R01|42|P|2.5\rPID|1||12345^^^MR\r";
//!
//! // Decode
//! let mut msg = read_to_end(bytes, &ReadOptions::default())?;
//! assert_eq!(msg.control_id(), Some("42"));
//!
//! // Edit
//! msg.delete("PID", 0);
//!
//! // Encode
//! let out = write(&msg, &WriteOptions::default());
//! assert_eq!(out.as_ref(), b"MSH|^~\\&|LAB|HOSP|||||ORU^R01|42|P|2.5\r");
//! # Ok::<(), hl7v2::Error>(())
//! ```
//!
//! # Streaming
//!
//! Bytes arriving in chunks go through [`Reader`]. A read that stops in the
//! middle of a segment returns the reader and the unconsumed tail; append
//! more bytes to the tail and read again.
//!
//! ```rust
//! use hl7v2::{ReadOptions, ReadOutcome, Reader};
//!
//! let reader = Reader::new(ReadOptions::default());
//! let ReadOutcome::Incomplete(reader, tail) = reader.read(b"MSH|^~\\&|A\rPI")? else {
//!     unreachable!()
//! };
//!
//! let mut buffer = tail.to_vec();
//! buffer.extend_from_slice(b"D|1\r");
//! let msg = reader.read(&buffer)?.complete().expect("terminated");
//! assert_eq!(msg.len(), 2);
//! # Ok::<(), hl7v2::Error>(())
//! ```
//!
//! # Features
//!
//! - **Lenient escaping** - unknown escape sequences survive as literal text
//! - **Resumable reads** - continuation state is a plain value, serializable
//!   with the `serde` feature
//! - **Segment addressing** - lookup, paired-segment grouping and in-place
//!   edits by segment ID and repetition

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;

pub use protocol::{
    Component, Error, Field, Format, HeaderBuilder, Message, ReadOptions, ReadOutcome, Reader,
    ReaderState, Repetition, Result, Segment, SegmentId, Separators, WriteOptions, escape, read,
    read_to_end, unescape, write, write_chunks,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! HL7 message codec (read/write entry points)
//!
//! # Format
//!
//! ```text
//! MSH|^~\&|SENDER|...<CR>
//! PID|1||12345^^^MR~67890<CR>
//!    │   │     │    └ repetition
//!    │   │     └ component
//!    │   └ field
//!    └ segment ID
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, instrument};

use super::metrics::Metrics;
use super::{Message, ReadOptions, ReadOutcome, Reader, Result, Segment, WriteOptions};

/// Read a message from `buffer` with a fresh [`Reader`]
pub fn read(buffer: &[u8], options: &ReadOptions) -> Result<ReadOutcome> {
    Reader::new(options.clone()).read(buffer)
}

/// Read a message that is known to be complete.
///
/// The final segment may omit its terminator.
pub fn read_to_end(buffer: &[u8], options: &ReadOptions) -> Result<Message> {
    match read(buffer, options)? {
        ReadOutcome::Complete(message) => Ok(message),
        ReadOutcome::Incomplete(reader, tail) => reader.finish(&tail),
    }
}

/// Encode a message to bytes
///
/// Header segments (`MSH`, `BHS`, `FHS`) declare `options.separators`
/// regardless of the separators stored in their first two fields.
#[must_use]
#[instrument(level = "debug", skip_all, fields(segments = message.len()))]
pub fn write(message: &Message, options: &WriteOptions) -> Bytes {
    let mut out = BytesMut::with_capacity(estimate_size(message));
    let mut line = String::new();

    for segment in message {
        encode_line(segment, options, &mut line);
        out.extend_from_slice(line.as_bytes());
        out.put_u8(options.output_format.terminator());
    }

    debug!(bytes = out.len(), "message written");
    Metrics::record_write(message.len(), out.len());
    out.freeze()
}

/// Encode a message one segment at a time, terminator included.
///
/// Concatenating the chunks gives the output of [`write`].
pub fn write_chunks<'a>(
    message: &'a Message,
    options: &'a WriteOptions,
) -> impl Iterator<Item = Bytes> + 'a {
    let mut line = String::new();
    message.iter().map(move |segment| {
        encode_line(segment, options, &mut line);
        let mut chunk = BytesMut::with_capacity(line.len() + 1);
        chunk.extend_from_slice(line.as_bytes());
        chunk.put_u8(options.output_format.terminator());
        chunk.freeze()
    })
}

fn encode_line(segment: &Segment, options: &WriteOptions, line: &mut String) {
    line.clear();
    if options.trim {
        let mut trimmed = segment.clone();
        trimmed.trim();
        trimmed.encode_into(line, &options.separators);
    } else {
        segment.encode_into(line, &options.separators);
    }
}

fn estimate_size(message: &Message) -> usize {
    // Rough guess: a handful of short fields per segment.
    message
        .iter()
        .map(|segment| 4 + segment.field_count() * 8)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, Format, SegmentId, Separators};

    const SAMPLE: &[u8] = b"MSH|^~\\&|A|B|C|D||MSG^T|1|P|2.4\rPID|1\r";

    #[test]
    fn test_read_write_identity() {
        let message = read_to_end(SAMPLE, &ReadOptions::default()).unwrap();

        assert_eq!(message.len(), 2);
        assert_eq!(message.at(0).unwrap().id(), "MSH");
        assert_eq!(message.at(1).unwrap().id(), "PID");

        let written = write(&message, &WriteOptions::default());
        assert_eq!(written.as_ref(), SAMPLE);
    }

    #[test]
    fn test_write_text_format() {
        let message = read_to_end(SAMPLE, &ReadOptions::default()).unwrap();
        let options = WriteOptions {
            output_format: Format::Text,
            ..WriteOptions::default()
        };

        let written = write(&message, &options);
        assert_eq!(
            written.as_ref(),
            b"MSH|^~\\&|A|B|C|D||MSG^T|1|P|2.4\nPID|1\n"
        );
    }

    #[test]
    fn test_write_with_other_separators() {
        let message =
            read_to_end(b"MSH|^~\\&|A\rNTE|1||a#b^c\r", &ReadOptions::default()).unwrap();
        let options = WriteOptions {
            separators: Separators::compile("#$%!*").unwrap(),
            ..WriteOptions::default()
        };

        let written = write(&message, &options);
        assert_eq!(written.as_ref(), b"MSH#$%!*#A\rNTE#1##a!F!b$c\r");

        let reread = read_to_end(&written, &ReadOptions::default()).unwrap();
        assert_eq!(reread.at(1), message.at(1));
    }

    #[test]
    fn test_write_with_other_escape_character() {
        let message = read_to_end(b"MSH|^~\\&|A\rNTE|1||x^y\\z!\r", &ReadOptions::default())
            .unwrap();
        assert_eq!(message.at(1).unwrap().field_text(3), None);

        let options = WriteOptions {
            separators: Separators::DEFAULT.with_escape('!').unwrap(),
            ..WriteOptions::default()
        };
        let written = write(&message, &options);
        assert_eq!(written.as_ref(), b"MSH|^~!&|A\rNTE|1||x^y\\z!E!\r");

        let reread = read_to_end(&written, &ReadOptions::default()).unwrap();
        assert_eq!(reread.at(1), message.at(1));
        assert_eq!(reread.declared_separators().map(|s| s.escape()), Some('!'));
    }

    #[test]
    fn test_write_untrimmed_keeps_trailing_items() {
        let pid = Segment::new(SegmentId::new("PID").unwrap())
            .field_set(1, "1")
            .field_set(3, Field::empty());
        let message = Message::from_segments([pid]);

        let untrimmed = WriteOptions {
            trim: false,
            ..WriteOptions::default()
        };
        assert_eq!(write(&message, &untrimmed).as_ref(), b"PID|1||\r");
        assert_eq!(write(&message, &WriteOptions::default()).as_ref(), b"PID|1\r");
    }

    #[test]
    fn test_write_empty_message() {
        assert!(write(&Message::new(), &WriteOptions::default()).is_empty());
    }

    #[test]
    fn test_write_chunks_concatenate() {
        let message = read_to_end(SAMPLE, &ReadOptions::default()).unwrap();
        let options = WriteOptions::default();

        let chunks: Vec<Bytes> = write_chunks(&message, &options).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.concat(), write(&message, &options).to_vec());
    }

    #[test]
    fn test_read_to_end_without_final_terminator() {
        let message = read_to_end(b"MSH|^~\\&|A\rPID|1", &ReadOptions::default()).unwrap();
        assert_eq!(message.len(), 2);
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use crate::{Component, Repetition};
        use proptest::prelude::*;

        fn separators_strategy() -> impl Strategy<Value = Separators> {
            prop::sample::subsequence(vec!['|', '^', '~', '\\', '&', '#', '$', '%', '!', '*'], 5)
                .prop_shuffle()
                .prop_map(|chars| {
                    Separators::new(chars[0], chars[1], chars[2], chars[3], chars[4]).unwrap()
                })
        }

        fn field_strategy() -> impl Strategy<Value = Field> {
            let leaf = "[a-z0-9 |^~&#$%!*\\\\\r\n]{0,5}";
            let component =
                prop::collection::vec(leaf, 0..3).prop_map(Component::from_subcomponents);
            let repetition =
                prop::collection::vec(component, 0..3).prop_map(Repetition::from_components);
            prop::collection::vec(repetition, 0..3).prop_map(Field::from_repetitions)
        }

        fn segment_strategy() -> impl Strategy<Value = Segment> {
            (
                prop::sample::select(vec!["PID", "PV1", "OBX", "NTE", "ZZ1"]),
                prop::collection::vec(field_strategy(), 0..6),
            )
                .prop_map(|(id, fields)| {
                    Segment::with_fields(SegmentId::new(id).unwrap(), fields)
                })
        }

        fn message_strategy() -> impl Strategy<Value = (Message, Separators)> {
            (
                separators_strategy(),
                prop::collection::vec(field_strategy(), 0..4),
                prop::collection::vec(segment_strategy(), 0..6),
            )
                .prop_map(|(separators, header_fields, segments)| {
                    let mut header = Segment::new(SegmentId::MSH)
                        .field_set(1, separators.field().to_string())
                        .field_set(2, separators.encoding_characters());
                    for (i, field) in header_fields.into_iter().enumerate() {
                        header.set_field(i + 3, field);
                    }
                    let mut message =
                        Message::from_segments(std::iter::once(header).chain(segments));
                    message.trim();
                    (message, separators)
                })
        }

        fn options_for(separators: Separators, format: Format) -> (ReadOptions, WriteOptions) {
            let read = ReadOptions {
                input_format: format,
                ..ReadOptions::default()
            };
            let write = WriteOptions {
                output_format: format,
                separators,
                ..WriteOptions::default()
            };
            (read, write)
        }

        proptest! {
            /// Property: reading what was written gives back the trimmed message
            #[test]
            fn prop_roundtrip_preserves_message(
                (message, separators) in message_strategy(),
                text in any::<bool>(),
            ) {
                let format = if text { Format::Text } else { Format::Wire };
                let (read_options, write_options) = options_for(separators, format);

                let written = write(&message, &write_options);
                let decoded = read(&written, &read_options).unwrap().complete();

                prop_assert_eq!(decoded, Some(message));
            }

            /// Property: chunked reads through continuations match a single read,
            /// wherever the cuts fall
            #[test]
            fn prop_chunked_read_matches_single_read(
                (message, separators) in message_strategy(),
                cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
            ) {
                let (read_options, write_options) = options_for(separators, Format::Wire);
                let written = write(&message, &write_options);

                let mut cuts: Vec<usize> = cuts
                    .iter()
                    .map(|cut| cut.index(written.len()))
                    .collect();
                cuts.sort_unstable();
                cuts.dedup();

                let mut reader = Reader::new(read_options.clone());
                let mut pending = Vec::new();
                let mut start = 0;
                for cut in cuts {
                    pending.extend_from_slice(&written[start..cut]);
                    start = cut;
                    match reader.read(&pending).unwrap() {
                        ReadOutcome::Incomplete(next, tail) => {
                            reader = next;
                            pending = tail.to_vec();
                        }
                        // Cut right after a terminator: keep appending to
                        // the completed message.
                        ReadOutcome::Complete(partial) => {
                            reader = Reader::resume(read_options.clone(), partial);
                            pending.clear();
                        }
                    }
                }
                pending.extend_from_slice(&written[start..]);
                let chunked = reader.read(&pending).unwrap().complete();
                let single = read(&written, &read_options).unwrap().complete();

                prop_assert_eq!(chunked, single);
            }

            /// Property: writing is deterministic
            #[test]
            fn prop_write_deterministic((message, separators) in message_strategy()) {
                let (_, options) = options_for(separators, Format::Wire);
                prop_assert_eq!(write(&message, &options), write(&message, &options));
            }
        }
    }
}

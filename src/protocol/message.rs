//! HL7 message: an ordered sequence of segments
//!
//! Segments are addressed by ID and a 0-based repetition index counting
//! only segments with that ID, in message order.

use bytes::Bytes;

use super::{Error, Field, Result, Segment, Separators, WriteOptions};

/// HL7 message
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    segments: Vec<Segment>,
}

impl Message {
    /// Create an empty message
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Create a message from segments in order
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Segments in order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Take the segments out of the message
    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Number of segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the message has no segments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Iterate over segments
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Segment at a position; negative or out-of-bounds positions give `None`
    #[must_use]
    pub fn at(&self, index: isize) -> Option<&Segment> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.segments.get(i))
    }

    /// Segment at a position, or `default` when out of bounds
    #[must_use]
    pub fn at_or<'a>(&'a self, index: isize, default: &'a Segment) -> &'a Segment {
        self.at(index).unwrap_or(default)
    }

    /// The `repetition`-th segment with this ID
    #[must_use]
    pub fn segment(&self, id: &str, repetition: usize) -> Option<&Segment> {
        self.position(id, repetition).map(|i| &self.segments[i])
    }

    /// Mutable access to the `repetition`-th segment with this ID
    pub fn segment_mut(&mut self, id: &str, repetition: usize) -> Option<&mut Segment> {
        self.position(id, repetition)
            .map(move |i| &mut self.segments[i])
    }

    /// First segment with this ID
    #[must_use]
    pub fn first_segment(&self, id: &str) -> Option<&Segment> {
        self.segment(id, 0)
    }

    /// Number of segments with this ID
    #[must_use]
    pub fn segment_count(&self, id: &str) -> usize {
        self.segments.iter().filter(|seg| seg.id() == id).count()
    }

    /// Locate a run of segments whose IDs follow `ids` in order.
    ///
    /// The run starts at the `repetition`-th segment with ID `ids[0]` and
    /// extends while each following segment has the next expected ID. The
    /// first mismatch ends the run, so the result may be a strict prefix of
    /// `ids`. A missing anchor gives an empty result.
    ///
    /// ```
    /// # use hl7v2::{Message, Segment, SegmentId};
    /// let seg = |id| Segment::new(SegmentId::new(id).unwrap());
    /// let msg = Message::from_segments([seg("PR1"), seg("AUT"), seg("PR1"), seg("AUT")]);
    ///
    /// assert_eq!(msg.paired_segments(&["PR1", "AUT"], 1).len(), 2);
    /// assert_eq!(msg.paired_segments(&["AUT", "PR1"], 1).len(), 1);
    /// ```
    #[must_use]
    pub fn paired_segments(&self, ids: &[&str], repetition: usize) -> Vec<&Segment> {
        let Some((first, rest)) = ids.split_first() else {
            return Vec::new();
        };
        let Some(start) = self.position(first, repetition) else {
            return Vec::new();
        };

        let mut run = vec![&self.segments[start]];
        for (expected, segment) in rest.iter().zip(&self.segments[start + 1..]) {
            if segment.id() != *expected {
                break;
            }
            run.push(segment);
        }
        run
    }

    /// Remove the `repetition`-th segment with this ID.
    ///
    /// Returns the removed segment; a missing match leaves the message as is.
    pub fn delete(&mut self, id: &str, repetition: usize) -> Option<Segment> {
        self.position(id, repetition)
            .map(|i| self.segments.remove(i))
    }

    /// Replace the `repetition`-th segment with this ID, keeping its position.
    ///
    /// Returns the replaced segment; a missing match leaves the message as is
    /// and drops `segment`.
    pub fn replace(&mut self, id: &str, repetition: usize, segment: Segment) -> Option<Segment> {
        self.position(id, repetition)
            .map(|i| std::mem::replace(&mut self.segments[i], segment))
    }

    /// Insert segments immediately before the `repetition`-th segment with
    /// this ID.
    ///
    /// Fails with [`Error::SegmentNotFound`] when there is no such segment;
    /// the message is then left unchanged.
    pub fn insert_before(
        &mut self,
        id: &str,
        repetition: usize,
        segments: impl IntoIterator<Item = Segment>,
    ) -> Result<()> {
        let at = self.anchor(id, repetition)?;
        self.segments.splice(at..at, segments);
        Ok(())
    }

    /// Insert segments immediately after the `repetition`-th segment with
    /// this ID.
    ///
    /// Fails with [`Error::SegmentNotFound`] when there is no such segment;
    /// the message is then left unchanged.
    pub fn insert_after(
        &mut self,
        id: &str,
        repetition: usize,
        segments: impl IntoIterator<Item = Segment>,
    ) -> Result<()> {
        let at = self.anchor(id, repetition)? + 1;
        self.segments.splice(at..at, segments);
        Ok(())
    }

    /// Trim every segment
    pub fn trim(&mut self) {
        self.segments.iter_mut().for_each(Segment::trim);
    }

    /// Separators declared by the leading header segment, if any
    #[must_use]
    pub fn declared_separators(&self) -> Option<Separators> {
        let header = self.segments.first().filter(|seg| seg.is_header())?;
        let mut field = header.field_text(1)?.chars();
        let field_sep = field.next().filter(|_| field.as_str().is_empty())?;
        Separators::from_encoding(field_sep, header.field_text(2)?).ok()
    }

    /// Message type (MSH-9), e.g. `ADT^A01`
    #[must_use]
    pub fn message_type(&self) -> Option<&Field> {
        self.first_segment("MSH").and_then(|msh| msh.field(9))
    }

    /// Message control ID (MSH-10)
    #[must_use]
    pub fn control_id(&self) -> Option<&str> {
        self.first_segment("MSH").and_then(|msh| msh.field_text(10))
    }

    /// Encode message to bytes
    #[must_use]
    pub fn encode(&self, options: &WriteOptions) -> Bytes {
        super::write(self, options)
    }

    /// Decode a complete message.
    ///
    /// The final segment may omit its terminator.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        super::read_to_end(bytes, &super::ReadOptions::default())
    }

    fn position(&self, id: &str, repetition: usize) -> Option<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, seg)| seg.id() == id)
            .nth(repetition)
            .map(|(i, _)| i)
    }

    fn anchor(&self, id: &str, repetition: usize) -> Result<usize> {
        self.position(id, repetition)
            .ok_or_else(|| Error::SegmentNotFound {
                id: id.to_owned(),
                repetition,
            })
    }
}

impl FromIterator<Segment> for Message {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Self::from_segments(iter)
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl IntoIterator for Message {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

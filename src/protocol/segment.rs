//! Segments and segment identifiers

use std::fmt;
use std::str::FromStr;

use super::{Error, Field, Result, SEGMENT_ID_LEN, Separators};

/// Three-character segment identifier (`[A-Z0-9]{3}`)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct SegmentId([u8; SEGMENT_ID_LEN]);

impl SegmentId {
    /// Message header
    pub const MSH: Self = Self(*b"MSH");
    /// Batch header
    pub const BHS: Self = Self(*b"BHS");
    /// File header
    pub const FHS: Self = Self(*b"FHS");

    /// Validate and build an identifier
    #[must_use]
    pub fn new(id: &str) -> Option<Self> {
        let bytes: [u8; SEGMENT_ID_LEN] = id.as_bytes().try_into().ok()?;
        bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            .then_some(Self(bytes))
    }

    /// Identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII bytes pass validation.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Whether segments with this ID declare the separator set
    #[must_use]
    pub fn is_header(&self) -> bool {
        matches!(*self, Self::MSH | Self::BHS | Self::FHS)
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({})", self.as_str())
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for SegmentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for SegmentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// Text that is not a valid segment identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid segment id {0:?}")]
pub struct InvalidSegmentId(String);

impl FromStr for SegmentId {
    type Err = InvalidSegmentId;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| InvalidSegmentId(s.to_owned()))
    }
}

impl TryFrom<String> for SegmentId {
    type Error = InvalidSegmentId;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SegmentId> for String {
    fn from(value: SegmentId) -> Self {
        value.as_str().to_owned()
    }
}

/// One segment: an identifier plus fields addressed by sequence number.
///
/// Field numbering starts at 1. In header segments field 1 is the field
/// separator and field 2 the encoding characters, both stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    id: SegmentId,
    fields: Vec<Field>,
}

impl Segment {
    /// Segment without fields
    #[must_use]
    pub const fn new(id: SegmentId) -> Self {
        Self {
            id,
            fields: Vec::new(),
        }
    }

    /// Segment with fields 1, 2, ... in order
    pub fn with_fields(id: SegmentId, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            id,
            fields: fields.into_iter().collect(),
        }
    }

    /// Segment identifier
    #[must_use]
    pub const fn id(&self) -> SegmentId {
        self.id
    }

    /// Whether this segment declares separators (`MSH`, `BHS`, `FHS`)
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.id.is_header()
    }

    /// All fields, starting with field 1
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Highest field sequence number present
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field by sequence number (1-based)
    #[must_use]
    pub fn field(&self, seq: usize) -> Option<&Field> {
        seq.checked_sub(1).and_then(|i| self.fields.get(i))
    }

    /// Plain text of a field without internal structure
    #[must_use]
    pub fn field_text(&self, seq: usize) -> Option<&str> {
        self.field(seq).and_then(Field::as_text)
    }

    /// Set a field, padding with empty fields up to `seq`.
    ///
    /// Sequence number 0 is ignored.
    pub fn set_field(&mut self, seq: usize, value: impl Into<Field>) {
        let Some(index) = seq.checked_sub(1) else {
            return;
        };
        if self.fields.len() <= index {
            self.fields.resize_with(index + 1, Field::empty);
        }
        self.fields[index] = value.into();
    }

    /// Builder form of [`set_field`](Self::set_field)
    #[must_use]
    pub fn field_set(mut self, seq: usize, value: impl Into<Field>) -> Self {
        self.set_field(seq, value);
        self
    }

    /// Trim every field and drop trailing empty fields
    pub fn trim(&mut self) {
        self.fields.iter_mut().for_each(Field::trim);
        while self.fields.last().is_some_and(Field::is_empty) {
            self.fields.pop();
        }
    }

    /// Parse a non-header segment line (terminator excluded)
    pub(crate) fn parse(line: &str, separators: &Separators, index: usize) -> Result<Self> {
        let mut slices = line.split(separators.field());
        let id = parse_id(slices.next().unwrap_or_default(), index)?;
        let fields = slices.map(|raw| Field::parse(raw, separators)).collect();
        Ok(Self { id, fields })
    }

    /// Parse a header segment line, returning the separators it declares
    pub(crate) fn parse_header(line: &str, index: usize) -> Result<(Self, Separators)> {
        let malformed = |reason: &str| Error::MalformedSegment {
            index,
            reason: reason.to_owned(),
        };

        let id_text = line.get(..SEGMENT_ID_LEN).ok_or_else(|| malformed("header too short"))?;
        let id = parse_id(id_text, index)?;
        if !id.is_header() {
            return Err(malformed("first segment must be MSH, BHS or FHS"));
        }

        let mut rest = line[SEGMENT_ID_LEN..].chars();
        let field_sep = rest
            .next()
            .ok_or_else(|| malformed("header declares no field separator"))?;
        if field_sep.is_ascii_alphanumeric() {
            return Err(malformed(&format!(
                "invalid segment id {:?}",
                &line[..SEGMENT_ID_LEN + 1]
            )));
        }
        let rest = rest.as_str();
        let (encoding, tail) = match rest.split_once(field_sep) {
            Some((encoding, tail)) => (encoding, Some(tail)),
            None => (rest, None),
        };
        let separators = Separators::from_encoding(field_sep, encoding)?;

        let mut fields = vec![
            Field::text(field_sep.to_string()),
            Field::text(encoding.to_owned()),
        ];
        if let Some(tail) = tail {
            fields.extend(
                tail.split(field_sep)
                    .map(|raw| Field::parse(raw, &separators)),
            );
        }

        Ok((Self { id, fields }, separators))
    }

    /// Append this segment, without terminator, to `out`
    pub(crate) fn encode_into(&self, out: &mut String, separators: &Separators) {
        out.push_str(self.id.as_str());
        let body = if self.is_header() {
            out.push(separators.field());
            out.push_str(&separators.encoding_characters());
            self.fields.get(2..).unwrap_or_default()
        } else {
            &self.fields[..]
        };
        for field in body {
            out.push(separators.field());
            field.encode_into(out, separators);
        }
    }
}

fn parse_id(text: &str, index: usize) -> Result<SegmentId> {
    if text.is_empty() {
        return Err(Error::MalformedSegment {
            index,
            reason: "missing segment id".to_owned(),
        });
    }
    SegmentId::new(text).ok_or_else(|| Error::MalformedSegment {
        index,
        reason: format!("invalid segment id {text:?}"),
    })
}

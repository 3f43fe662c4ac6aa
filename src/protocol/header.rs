//! Message header (MSH) construction
//!
//! ```text
//! MSH|^~\&|SENDAPP|SENDFAC|RECVAPP|RECVFAC|||ADT^A01|<control id>|P|2.5
//!  1   2      3       4       5       6    7 8   9         10      11 12
//! ```

use uuid::Uuid;

use super::{Field, Segment, SegmentId, Separators};

/// Default processing ID (production)
pub const DEFAULT_PROCESSING_ID: &str = "P";

/// Default version ID written to MSH-12
pub const DEFAULT_VERSION: &str = "2.5";

/// Builder for an `MSH` segment
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    separators: Separators,
    sending_application: Option<Field>,
    sending_facility: Option<Field>,
    receiving_application: Option<Field>,
    receiving_facility: Option<Field>,
    message_type: Option<Field>,
    control_id: Option<String>,
    processing_id: String,
    version: String,
}

impl HeaderBuilder {
    /// Start a header with the given message code and trigger event,
    /// e.g. `HeaderBuilder::new("ADT", "A01")`
    #[must_use]
    pub fn new(code: &str, event: &str) -> Self {
        Self {
            separators: Separators::DEFAULT,
            sending_application: None,
            sending_facility: None,
            receiving_application: None,
            receiving_facility: None,
            message_type: Some(Field::components([code, event])),
            control_id: None,
            processing_id: DEFAULT_PROCESSING_ID.to_owned(),
            version: DEFAULT_VERSION.to_owned(),
        }
    }

    /// Separators declared in MSH-1 and MSH-2
    #[must_use]
    pub fn separators(mut self, separators: Separators) -> Self {
        self.separators = separators;
        self
    }

    /// MSH-3
    #[must_use]
    pub fn sending_application(mut self, value: impl Into<Field>) -> Self {
        self.sending_application = Some(value.into());
        self
    }

    /// MSH-4
    #[must_use]
    pub fn sending_facility(mut self, value: impl Into<Field>) -> Self {
        self.sending_facility = Some(value.into());
        self
    }

    /// MSH-5
    #[must_use]
    pub fn receiving_application(mut self, value: impl Into<Field>) -> Self {
        self.receiving_application = Some(value.into());
        self
    }

    /// MSH-6
    #[must_use]
    pub fn receiving_facility(mut self, value: impl Into<Field>) -> Self {
        self.receiving_facility = Some(value.into());
        self
    }

    /// MSH-9, replacing the code and event given to [`new`](Self::new)
    #[must_use]
    pub fn message_type(mut self, value: impl Into<Field>) -> Self {
        self.message_type = Some(value.into());
        self
    }

    /// MSH-10; a random one is generated when not set
    #[must_use]
    pub fn control_id(mut self, value: impl Into<String>) -> Self {
        self.control_id = Some(value.into());
        self
    }

    /// MSH-11
    #[must_use]
    pub fn processing_id(mut self, value: impl Into<String>) -> Self {
        self.processing_id = value.into();
        self
    }

    /// MSH-12
    #[must_use]
    pub fn version(mut self, value: impl Into<String>) -> Self {
        self.version = value.into();
        self
    }

    /// Build the segment
    #[must_use]
    pub fn build(self) -> Segment {
        let control_id = self.control_id.unwrap_or_else(generate_control_id);
        let optional = [
            (3, self.sending_application),
            (4, self.sending_facility),
            (5, self.receiving_application),
            (6, self.receiving_facility),
            (9, self.message_type),
        ];

        let mut segment = Segment::new(SegmentId::MSH)
            .field_set(1, self.separators.field().to_string())
            .field_set(2, self.separators.encoding_characters());
        for (seq, value) in optional {
            if let Some(value) = value {
                segment.set_field(seq, value);
            }
        }
        segment
            .field_set(10, control_id)
            .field_set(11, self.processing_id)
            .field_set(12, self.version)
    }
}

/// Generate a unique message control ID (32 hex digits)
#[must_use]
pub fn generate_control_id() -> String {
    Uuid::new_v4().simple().to_string()
}

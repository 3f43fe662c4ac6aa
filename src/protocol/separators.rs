//! Separator set declared by a message header

use std::fmt;

use super::{Error, Result};

/// The five characters governing how a message is split and escaped.
///
/// Always valid: all five characters are distinct, none of them is a
/// segment terminator (`\r` or `\n`), and none is a letter or digit since
/// escape codes are spelled with those.
///
/// # Header order
///
/// ```text
/// MSH|^~\&|...
///    ││││└─ subcomponent
///    │││└── escape
///    ││└─── repetition
///    │└──── component
///    └───── field
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Separators {
    field: char,
    component: char,
    repetition: char,
    escape: char,
    subcomponent: char,
}

impl Separators {
    /// Standard set: `|^~\&`
    pub const DEFAULT: Self = Self {
        field: '|',
        component: '^',
        repetition: '~',
        escape: '\\',
        subcomponent: '&',
    };

    /// Build a separator set from explicit characters
    pub fn new(
        field: char,
        component: char,
        repetition: char,
        escape: char,
        subcomponent: char,
    ) -> Result<Self> {
        let candidate = Self {
            field,
            component,
            repetition,
            escape,
            subcomponent,
        };
        candidate.validate()?;
        Ok(candidate)
    }

    /// Compile a five-character separator string in header order, e.g. `"|^~\&"`
    pub fn compile(spec: &str) -> Result<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let [field, component, repetition, escape, subcomponent] = chars[..] else {
            return Err(Error::InvalidSeparators {
                spec: spec.to_owned(),
                reason: "expected exactly 5 characters",
            });
        };
        Self::new(field, component, repetition, escape, subcomponent)
    }

    /// Build a separator set from a header's field separator and its encoding
    /// characters field (MSH-2).
    ///
    /// A fifth encoding character (the v2.7 truncation character) is accepted
    /// and ignored.
    pub fn from_encoding(field: char, encoding: &str) -> Result<Self> {
        let chars: Vec<char> = encoding.chars().collect();
        match chars[..] {
            [component, repetition, escape, subcomponent]
            | [component, repetition, escape, subcomponent, _] => {
                Self::new(field, component, repetition, escape, subcomponent)
            }
            _ => Err(Error::InvalidSeparators {
                spec: format!("{field}{encoding}"),
                reason: "header must declare 4 encoding characters",
            }),
        }
    }

    /// Replace the escape character
    pub fn with_escape(self, escape: char) -> Result<Self> {
        Self::new(
            self.field,
            self.component,
            self.repetition,
            escape,
            self.subcomponent,
        )
    }

    /// Field separator
    #[must_use]
    pub const fn field(&self) -> char {
        self.field
    }

    /// Component separator
    #[must_use]
    pub const fn component(&self) -> char {
        self.component
    }

    /// Repetition separator
    #[must_use]
    pub const fn repetition(&self) -> char {
        self.repetition
    }

    /// Escape character
    #[must_use]
    pub const fn escape(&self) -> char {
        self.escape
    }

    /// Subcomponent separator
    #[must_use]
    pub const fn subcomponent(&self) -> char {
        self.subcomponent
    }

    /// Encoding characters as they appear in MSH-2
    #[must_use]
    pub fn encoding_characters(&self) -> String {
        [self.component, self.repetition, self.escape, self.subcomponent]
            .iter()
            .collect()
    }

    /// Whether `c` is one of the five characters
    #[must_use]
    pub const fn contains(&self, c: char) -> bool {
        c == self.field
            || c == self.component
            || c == self.repetition
            || c == self.escape
            || c == self.subcomponent
    }

    fn validate(&self) -> Result<()> {
        let all = [
            self.field,
            self.component,
            self.repetition,
            self.escape,
            self.subcomponent,
        ];

        if all.iter().any(|c| matches!(c, '\r' | '\n')) {
            return Err(Error::InvalidSeparators {
                spec: self.to_string(),
                reason: "segment terminator cannot be a separator",
            });
        }

        if all.iter().any(char::is_ascii_alphanumeric) {
            return Err(Error::InvalidSeparators {
                spec: self.to_string(),
                reason: "separators cannot be letters or digits",
            });
        }

        for (i, c) in all.iter().enumerate() {
            if all[i + 1..].contains(c) {
                return Err(Error::InvalidSeparators {
                    spec: self.to_string(),
                    reason: "characters must be distinct",
                });
            }
        }

        Ok(())
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Separators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.field, self.encoding_characters())
    }
}

impl std::str::FromStr for Separators {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl TryFrom<String> for Separators {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::compile(&value)
    }
}

impl From<Separators> for String {
    fn from(value: Separators) -> Self {
        value.to_string()
    }
}

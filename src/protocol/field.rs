//! Hierarchical field values
//!
//! A [`Field`] holds repetitions, a [`Repetition`] holds components and a
//! [`Component`] holds subcomponent strings. Repetitions are indexed from 0;
//! components and subcomponents use HL7 sequence numbers starting at 1.
//!
//! Leaf text is stored unescaped. Escaping happens only when a value is
//! encoded.

use super::{Separators, escape, unescape};

/// Innermost level: a sequence of subcomponent strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    subcomponents: Vec<String>,
}

/// A sequence of components
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repetition {
    components: Vec<Component>,
}

/// A field value: a sequence of repetitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    repetitions: Vec<Repetition>,
}

impl Component {
    /// Component with a single subcomponent
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            subcomponents: vec![text.into()],
        }
    }

    /// Component from subcomponent strings
    pub fn from_subcomponents<I, S>(subcomponents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subcomponents: subcomponents.into_iter().map(Into::into).collect(),
        }
    }

    /// Subcomponent strings
    #[must_use]
    pub fn subcomponents(&self) -> &[String] {
        &self.subcomponents
    }

    /// Subcomponent by sequence number (1-based)
    #[must_use]
    pub fn subcomponent(&self, seq: usize) -> Option<&str> {
        seq.checked_sub(1)
            .and_then(|i| self.subcomponents.get(i))
            .map(String::as_str)
    }

    /// Text of a component without subcomponent structure
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self.subcomponents.as_slice() {
            [] => Some(""),
            [only] => Some(only),
            _ => None,
        }
    }

    /// Whether every subcomponent is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subcomponents.iter().all(String::is_empty)
    }

    /// Drop trailing empty subcomponents
    pub fn trim(&mut self) {
        while self.subcomponents.last().is_some_and(String::is_empty) {
            self.subcomponents.pop();
        }
    }

    pub(crate) fn parse(raw: &str, separators: &Separators) -> Self {
        Self {
            subcomponents: raw
                .split(separators.subcomponent())
                .map(|sub| unescape(sub, separators).into_owned())
                .collect(),
        }
    }

    pub(crate) fn encode_into(&self, out: &mut String, separators: &Separators) {
        for (i, sub) in self.subcomponents.iter().enumerate() {
            if i > 0 {
                out.push(separators.subcomponent());
            }
            out.push_str(&escape(sub, separators));
        }
    }
}

impl Repetition {
    /// Repetition with a single text component
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            components: vec![Component::text(text)],
        }
    }

    /// Repetition from components
    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Components
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Component by sequence number (1-based)
    #[must_use]
    pub fn component(&self, seq: usize) -> Option<&Component> {
        seq.checked_sub(1).and_then(|i| self.components.get(i))
    }

    /// Text of a repetition without component structure
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self.components.as_slice() {
            [] => Some(""),
            [only] => only.as_text(),
            _ => None,
        }
    }

    /// Whether every component is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.iter().all(Component::is_empty)
    }

    /// Drop trailing empty components, trimming each component first
    pub fn trim(&mut self) {
        self.components.iter_mut().for_each(Component::trim);
        while self.components.last().is_some_and(Component::is_empty) {
            self.components.pop();
        }
    }

    pub(crate) fn parse(raw: &str, separators: &Separators) -> Self {
        Self {
            components: raw
                .split(separators.component())
                .map(|comp| Component::parse(comp, separators))
                .collect(),
        }
    }

    pub(crate) fn encode_into(&self, out: &mut String, separators: &Separators) {
        for (i, comp) in self.components.iter().enumerate() {
            if i > 0 {
                out.push(separators.component());
            }
            comp.encode_into(out, separators);
        }
    }
}

impl Field {
    /// Empty field
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            repetitions: Vec::new(),
        }
    }

    /// Field holding plain text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            repetitions: vec![Repetition::text(text)],
        }
    }

    /// Single-repetition field whose components are plain text, e.g.
    /// `Field::components(["ADT", "A01"])` for `ADT^A01`
    pub fn components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repetitions: vec![Repetition::from_components(
                components.into_iter().map(Component::text),
            )],
        }
    }

    /// Field from repetitions
    pub fn from_repetitions(repetitions: impl IntoIterator<Item = Repetition>) -> Self {
        Self {
            repetitions: repetitions.into_iter().collect(),
        }
    }

    /// Repetitions
    #[must_use]
    pub fn repetitions(&self) -> &[Repetition] {
        &self.repetitions
    }

    /// Repetition by index (0-based)
    #[must_use]
    pub fn repetition(&self, index: usize) -> Option<&Repetition> {
        self.repetitions.get(index)
    }

    /// Component of the first repetition by sequence number (1-based)
    #[must_use]
    pub fn component(&self, seq: usize) -> Option<&Component> {
        self.repetitions.first().and_then(|rep| rep.component(seq))
    }

    /// Text of a field without internal structure.
    ///
    /// Returns `None` when the field has more than one repetition, component
    /// or subcomponent.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self.repetitions.as_slice() {
            [] => Some(""),
            [only] => only.as_text(),
            _ => None,
        }
    }

    /// Whether every leaf is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repetitions.iter().all(Repetition::is_empty)
    }

    /// Drop trailing empty items at every level, innermost first
    pub fn trim(&mut self) {
        self.repetitions.iter_mut().for_each(Repetition::trim);
        while self.repetitions.last().is_some_and(Repetition::is_empty) {
            self.repetitions.pop();
        }
    }

    /// Trimmed copy
    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.trim();
        self
    }

    /// Split and unescape one field slice
    #[must_use]
    pub fn parse(raw: &str, separators: &Separators) -> Self {
        Self {
            repetitions: raw
                .split(separators.repetition())
                .map(|rep| Repetition::parse(rep, separators))
                .collect(),
        }
    }

    /// Escape and join this field with `separators`
    #[must_use]
    pub fn encode(&self, separators: &Separators) -> String {
        let mut out = String::new();
        self.encode_into(&mut out, separators);
        out
    }

    pub(crate) fn encode_into(&self, out: &mut String, separators: &Separators) {
        for (i, rep) in self.repetitions.iter().enumerate() {
            if i > 0 {
                out.push(separators.repetition());
            }
            rep.encode_into(out, separators);
        }
    }
}

impl From<&str> for Field {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Field {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

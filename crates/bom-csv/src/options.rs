use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::SortOrder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeparatorError {
    #[error("separator must be exactly one character, got {0:?}")]
    Length(String),

    #[error("{0:?} cannot be used as a separator")]
    Reserved(char),
}

/// Single character placed between CSV fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator(char);

impl Separator {
    pub const COMMA: Separator = Separator(',');

    pub fn new(c: char) -> Result<Self, SeparatorError> {
        if matches!(c, '"' | '\n' | '\r') {
            return Err(SeparatorError::Reserved(c));
        }
        Ok(Self(c))
    }

    /// The separator as a csv delimiter byte, if it fits in one
    pub fn as_byte(self) -> Option<u8> {
        self.0.is_ascii().then_some(self.0 as u8)
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::COMMA
    }
}

impl FromStr for Separator {
    type Err = SeparatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(SeparatorError::Length(s.to_string())),
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Which report to render
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportKind {
    /// One row per component, in document order
    #[default]
    Flat,
    /// One row per distinct field value with its member count
    Grouped { field: String, show_refs: bool },
    /// Grouped rows with designator list and footprint, under a header row
    Assembly { field: String },
}

impl ReportKind {
    /// Field the report groups by, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ReportKind::Flat => None,
            ReportKind::Grouped { field, .. } | ReportKind::Assembly { field } => Some(field),
        }
    }

    /// Order applied to components before grouping
    pub fn sort_order(&self) -> SortOrder {
        match self {
            ReportKind::Assembly { .. } => SortOrder::Alphanumeric,
            _ => SortOrder::Reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub separator: Separator,
    pub kind: ReportKind,
}

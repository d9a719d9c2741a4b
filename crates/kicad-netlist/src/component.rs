use std::collections::BTreeMap;
use std::fmt;

/// One BOM line item from a KiCad export `<comp>` record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    reference: String,
    value: String,
    footprint: String,
    datasheet: String,
    fields: BTreeMap<String, String>,
}

impl Component {
    pub fn new(reference: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_footprint(mut self, footprint: impl Into<String>) -> Self {
        self.footprint = footprint.into();
        self
    }

    pub fn with_datasheet(mut self, datasheet: impl Into<String>) -> Self {
        self.datasheet = datasheet.into();
        self
    }

    /// Set a user field. A later call with the same name replaces the earlier value.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn footprint(&self) -> &str {
        &self.footprint
    }

    pub fn datasheet(&self) -> &str {
        &self.datasheet
    }

    /// Look up a user field by name.
    ///
    /// Returns `None` when the field was never set, and `Some("")` when the
    /// export carried the field with no text.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All user fields, ordered by name
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Quoted CSV fields for the flat report: reference, value, footprint, datasheet
    pub fn csv_fields(&self) -> [String; 4] {
        [
            quote(&self.reference),
            quote(&self.value),
            quote(&self.footprint),
            quote(&self.datasheet),
        ]
    }

    pub(crate) fn set_footprint(&mut self, footprint: String) {
        self.footprint = footprint;
    }

    pub(crate) fn set_datasheet(&mut self, datasheet: String) {
        self.datasheet = datasheet;
    }

    pub(crate) fn insert_field(&mut self, name: String, value: String) {
        self.fields.insert(name, value);
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.reference, self.value)
    }
}

/// Wrap a field in double quotes. Embedded quotes are written as-is.
pub fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

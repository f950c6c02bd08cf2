//! State of an object as reported by the device.

use indexmap::IndexMap;
use thiserror::Error;

/// A field value scraped from a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedValue {
    /// Everything after the field name on a single line.
    Scalar(String),
    /// A bare token line such as `vlans-disabled` or `enabled`.
    Flag,
    /// The absorbed text of a multi-line block, header line included.
    Composite(String),
}

/// A line or block that could not be extracted. Recovered by omitting the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: cannot split '{text}' into field and value")]
    Malformed { line: usize, text: String },

    #[error("line {line}: block '{field}' has no terminator")]
    Unterminated { line: usize, field: String },
}

/// Fields of an object that exists on the device, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedFields {
    entries: IndexMap<String, ObservedValue>,
    parse_errors: Vec<ParseError>,
    header_seen: bool,
}

impl ObservedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field. A repeated name keeps the first position and value.
    pub fn record(&mut self, field: impl Into<String>, value: ObservedValue) {
        self.entries.entry(field.into()).or_insert(value);
    }

    pub(crate) fn record_error(&mut self, error: ParseError) {
        self.parse_errors.push(error);
    }

    pub(crate) fn mark_header(&mut self) {
        self.header_seen = true;
    }

    /// Whether the object's own header line (`<path> <name> {`) was seen.
    pub fn header_seen(&self) -> bool {
        self.header_seen
    }

    pub fn get(&self, field: &str) -> Option<&ObservedValue> {
        self.entries.get(field)
    }

    /// Fields in the order they were encountered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObservedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lines or blocks skipped during extraction.
    pub fn parse_errors(&self) -> &[ParseError] {
        &self.parse_errors
    }
}

/// Result of extracting a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedConfig {
    /// The device reported that the object does not exist.
    Absent,
    Present(ObservedFields),
}

impl ObservedConfig {
    pub fn is_absent(&self) -> bool {
        matches!(self, ObservedConfig::Absent)
    }

    pub fn fields(&self) -> Option<&ObservedFields> {
        match self {
            ObservedConfig::Absent => None,
            ObservedConfig::Present(fields) => Some(fields),
        }
    }
}

//! Field extraction from filtered listing lines.

use log::debug;

use super::filter::{LineClass, LineFilter};
use crate::error::ReconcileError;
use crate::model::{ObservedConfig, ObservedFields, ObservedValue, ParseError};

/// Turns a listing into an [`ObservedConfig`].
///
/// The scan is a single forward cursor: a block consumes its lines and hands
/// back the index where the scan continues, so absorbed lines are never
/// re-read as top-level fields.
#[derive(Debug, Clone)]
pub struct FieldExtractor<'a> {
    filter: LineFilter<'a>,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(filter: LineFilter<'a>) -> Self {
        Self { filter }
    }

    /// Extract fields from `lines` (raw or already filtered).
    ///
    /// Fails only when existence cannot be decided; unparseable lines and
    /// unterminated blocks are recorded on the result and skipped.
    pub fn extract<S: AsRef<str>>(
        &self,
        lines: &[S],
        name: &str,
    ) -> Result<ObservedConfig, ReconcileError> {
        let mut fields = ObservedFields::new();
        let mut cursor = 0;

        while cursor < lines.len() {
            let line = lines[cursor].as_ref();
            cursor = match self.filter.classify(line) {
                LineClass::Sentinel => {
                    if fields.header_seen() {
                        return Err(self.ambiguous(
                            name,
                            format!("'{}' reported after the object header", line.trim()),
                        ));
                    }
                    debug!("extract: {} '{}' not found on device", self.kind_name(), name);
                    return Ok(ObservedConfig::Absent);
                }
                LineClass::Header => {
                    fields.mark_header();
                    cursor + 1
                }
                LineClass::Block { field, terminator } => {
                    match self.filter.block_end(lines, cursor, &terminator) {
                        Some((last, next)) => {
                            let value = self.absorb(&lines[cursor..=last]);
                            debug!("extract: composite {} = {:?}", field, value);
                            fields.record(field, ObservedValue::Composite(value));
                            next
                        }
                        None => {
                            let error = ParseError::Unterminated {
                                line: cursor + 1,
                                field,
                            };
                            debug!("extract: skipped: {}", error);
                            fields.record_error(error);
                            cursor + 1
                        }
                    }
                }
                LineClass::Noise | LineClass::Blank => cursor + 1,
                LineClass::Data => {
                    self.extract_line(cursor, line, &mut fields);
                    cursor + 1
                }
            };
        }

        if fields.is_empty() && !fields.header_seen() {
            return Err(self.ambiguous(
                name,
                "reply has no object header, no field and no not-found phrase".to_string(),
            ));
        }
        Ok(ObservedConfig::Present(fields))
    }

    /// Split a data line into field and value.
    fn extract_line(&self, index: usize, line: &str, fields: &mut ObservedFields) {
        let content = self.filter.dialect().content(line);
        match content.split_once(char::is_whitespace) {
            Some((field, value)) => {
                fields.record(field, ObservedValue::Scalar(value.trim().to_string()));
            }
            None if self.filter.kind().boolean_pair(content).is_some() => {
                fields.record(content, ObservedValue::Flag);
            }
            None => {
                let error = ParseError::Malformed {
                    line: index + 1,
                    text: content.to_string(),
                };
                debug!("extract: skipped: {}", error);
                fields.record_error(error);
            }
        }
    }

    /// Join the stripped, comma-free content of a block's lines.
    fn absorb<S: AsRef<str>>(&self, block: &[S]) -> String {
        let dialect = self.filter.dialect();
        block
            .iter()
            .map(|line| dialect.content(line.as_ref()).replace(',', ""))
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn kind_name(&self) -> &str {
        &self.filter.kind().name
    }

    fn ambiguous(&self, name: &str, reason: String) -> ReconcileError {
        ReconcileError::AmbiguousState {
            kind: self.kind_name().to_string(),
            name: name.to_string(),
            reason,
        }
    }
}

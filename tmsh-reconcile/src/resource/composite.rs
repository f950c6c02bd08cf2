//! Multi-line composite field definitions.

use serde::{Deserialize, Serialize};

use crate::engine::normalize;
use crate::model::FieldValue;

/// How a composite value is reduced before equality comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Whitespace runs collapsed, order kept.
    Verbatim,
    /// Whitespace and commas removed entirely, order kept.
    Compact,
    /// Brace structure parsed; each block compared as a set of members.
    #[default]
    Unordered,
    /// Brace structure parsed; each block compared as a set of `key value`
    /// pairs, so a value stays bound to its key.
    Pairs,
}

impl Normalization {
    pub fn apply(self, text: &str) -> String {
        normalize::normalize(self, text)
    }
}

/// Where an absorbed block ends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Terminator {
    /// The line that closes the header's brace; that line belongs to the block.
    #[default]
    ClosingBrace,
    /// The first later line containing the marker; that line starts the next field.
    Before(String),
    /// The first later line containing the marker; that line belongs to the block.
    Through(String),
}

/// Which command verb a composite argument is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Create,
    Modify,
}

/// A field whose device-side value spans several listing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompositeField {
    /// Field name, as used in desired state and commands.
    pub name: String,

    /// First token of the line that opens the block.
    pub start_marker: String,

    #[serde(default)]
    pub terminator: Terminator,

    #[serde(default)]
    pub normalization: Normalization,

    /// Keyword placed between field and value on create (e.g. `add`).
    #[serde(default)]
    pub create_keyword: Option<String>,

    /// Keyword placed between field and value on modify (e.g. `replace-all-with`).
    #[serde(default)]
    pub modify_keyword: Option<String>,
}

impl CompositeField {
    /// A brace-delimited block opened by a line starting with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            start_marker: name.clone(),
            name,
            terminator: Terminator::ClosingBrace,
            normalization: Normalization::Unordered,
            create_keyword: None,
            modify_keyword: None,
        }
    }

    pub fn with_start_marker(mut self, marker: impl Into<String>) -> Self {
        self.start_marker = marker.into();
        self
    }

    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_create_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.create_keyword = Some(keyword.into());
        self
    }

    pub fn with_modify_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.modify_keyword = Some(keyword.into());
        self
    }

    /// Whether a (pager-stripped, trimmed) line opens this block.
    pub fn starts_at(&self, content: &str) -> bool {
        content.split_whitespace().next() == Some(self.start_marker.as_str())
    }

    /// Normalize the absorbed device text (header line included).
    pub fn normalize_observed(&self, raw: &str) -> String {
        let body = normalize::strip_leading_token(raw, &self.start_marker);
        self.normalization.apply(body)
    }

    /// Normalize a desired value for comparison with [`normalize_observed`](Self::normalize_observed).
    pub fn normalize_desired(&self, value: &FieldValue) -> String {
        self.normalization.apply(&value.render())
    }

    /// Render the command argument (keyword and value) for this field.
    pub fn render_argument(&self, value: &FieldValue, phase: RenderPhase) -> String {
        let keyword = match phase {
            RenderPhase::Create => self.create_keyword.as_deref(),
            RenderPhase::Modify => self.modify_keyword.as_deref(),
        };
        match keyword {
            Some(kw) => format!("{} {}", kw, value.render()),
            None => value.render(),
        }
    }
}

//! Caller-supplied desired state for one object.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Keys that steer the reconciliation rather than describe the object.
pub const RESERVED_FIELDS: &[&str] = &["name", "partition", "state"];

/// Keys naming the object; a number given for one is kept as its text.
const IDENTITY_FIELDS: &[&str] = &["name", "partition"];

/// Partition used when the caller does not name one.
pub const DEFAULT_PARTITION: &str = "Common";

/// A single desired field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    /// Members of a composite field, rendered as `{ a b c }`.
    List(Vec<String>),
}

impl FieldValue {
    /// Render the value as it appears on a command line.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::List(items) if items.is_empty() => "none".to_string(),
            FieldValue::List(items) => {
                let inner: Vec<&str> = items.iter().map(|s| s.trim()).collect();
                format!("{{ {} }}", inner.join(" "))
            }
        }
    }

    /// Whether the value switches a flag on.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Integer(n) => *n != 0,
            FieldValue::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "enabled"
            ),
            FieldValue::List(items) => !items.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Desired presence of the object.
///
/// `Enabled` and `Disabled` imply presence and also request that admin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
    Enabled,
    Disabled,
}

impl DesiredState {
    pub fn is_absent(self) -> bool {
        self == DesiredState::Absent
    }

    /// The admin-state flag this state asks for, if any.
    pub fn admin_flag(self) -> Option<&'static str> {
        match self {
            DesiredState::Enabled => Some("enabled"),
            DesiredState::Disabled => Some("disabled"),
            _ => None,
        }
    }
}

impl FromStr for DesiredState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(DesiredState::Present),
            "absent" => Ok(DesiredState::Absent),
            "enabled" => Ok(DesiredState::Enabled),
            "disabled" => Ok(DesiredState::Disabled),
            _ => Err(ConfigError::UnknownState {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            DesiredState::Present => "present",
            DesiredState::Absent => "absent",
            DesiredState::Enabled => "enabled",
            DesiredState::Disabled => "disabled",
        };
        f.write_str(word)
    }
}

/// Ordered mapping from field name to desired value.
///
/// Always expected to carry `name`; `partition` defaults to `Common` and
/// `state` to `present`. Values are passed through to the device as given.
///
/// # Example
///
/// ```rust
/// use tmsh_reconcile::DesiredConfig;
///
/// let desired = DesiredConfig::new()
///     .with("name", "t1")
///     .with("partition", "Common")
///     .with("idle-timeout", 300);
/// assert_eq!(desired.name(), Some("t1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, FieldValue>",
    into = "IndexMap<String, FieldValue>"
)]
pub struct DesiredConfig {
    fields: IndexMap<String, FieldValue>,
}

impl DesiredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field, keeping its original position on replace.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        let field = field.into();
        let value = match value.into() {
            FieldValue::Integer(n) if IDENTITY_FIELDS.contains(&field.as_str()) => {
                FieldValue::Text(n.to_string())
            }
            value => value,
        };
        self.fields.insert(field, value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields in caller order, reserved keys included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields describing the object itself (everything except name/partition/state).
    pub fn managed_fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.iter().filter(|(k, _)| !RESERVED_FIELDS.contains(k))
    }

    pub fn name(&self) -> Option<&str> {
        self.text_field("name")
    }

    /// The object name, or a `MissingField` error.
    pub fn require_name(&self) -> Result<&str, ConfigError> {
        self.name().ok_or_else(|| ConfigError::MissingField {
            field: "name".to_string(),
        })
    }

    /// The partition, defaulting to `Common`.
    pub fn partition(&self) -> &str {
        self.text_field("partition").unwrap_or(DEFAULT_PARTITION)
    }

    /// The desired presence, defaulting to `present`.
    pub fn state(&self) -> Result<DesiredState, ConfigError> {
        match self.fields.get("state") {
            None => Ok(DesiredState::Present),
            Some(value) => value.render().parse(),
        }
    }

    /// Whether `field` is switched on, either directly or through `state`.
    pub fn is_truthy(&self, field: &str) -> bool {
        if let Some(value) = self.fields.get(field) {
            return value.is_truthy();
        }
        matches!(self.state(), Ok(state) if state.admin_flag() == Some(field))
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for DesiredConfig
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = DesiredConfig::new();
        for (k, v) in iter {
            config.insert(k, v);
        }
        config
    }
}

impl From<IndexMap<String, FieldValue>> for DesiredConfig {
    fn from(fields: IndexMap<String, FieldValue>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<DesiredConfig> for IndexMap<String, FieldValue> {
    fn from(config: DesiredConfig) -> Self {
        config.fields
    }
}

//! Resource kind descriptor.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::composite::CompositeField;
use crate::error::ConfigError;
use crate::model::{DesiredConfig, RESERVED_FIELDS};

static ROUTE_DOMAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[0-9]+").unwrap());

/// Per-field rule for comparing scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarRule {
    /// Trimmed string equality.
    #[default]
    Exact,
    /// `address:port`, ignoring a `%N` route domain and a leading `/folder/` path.
    AddressPort,
}

impl ScalarRule {
    pub fn equals(self, observed: &str, desired: &str) -> bool {
        match self {
            ScalarRule::Exact => observed.trim() == desired.trim(),
            ScalarRule::AddressPort => {
                Self::bare_address(observed) == Self::bare_address(desired)
            }
        }
    }

    fn bare_address(value: &str) -> String {
        let value = value.trim();
        let value = value.rsplit('/').next().unwrap_or(value);
        ROUTE_DOMAIN.replace_all(value, "").into_owned()
    }
}

/// Everything the generic engine needs to know about one object type.
///
/// Kinds are data: the built-ins live in [`kinds`](super::kinds), and
/// custom kinds can be built in code or deserialized.
///
/// # Example
///
/// ```rust
/// use tmsh_reconcile::resource::{CompositeField, ResourceKind};
///
/// let kind = ResourceKind::new("http", "ltm profile http")
///     .with_noise_markers(["END", "}", "ltm"])
///     .with_noise_field("description")
///     .with_composite(CompositeField::new("xff-alternative-names"));
/// assert!(kind.composite("xff-alternative-names").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ResourceKind {
    /// Registry name (e.g. "tcp", "virtual-server").
    pub name: String,

    /// Object path used on list/create/modify/delete lines (e.g. "ltm profile tcp").
    pub object_path: String,

    /// Fields managed for this kind. `None` means every field is managed.
    pub known_fields: Option<Vec<String>>,

    /// Words that mark a listing line as noise when the line starts with them.
    pub noise_markers: Vec<String>,

    /// Fields the device lists but that are never compared.
    pub noise_fields: Vec<String>,

    /// Multi-line fields absorbed into a single value.
    pub composites: Vec<CompositeField>,

    /// Mutually exclusive flag lines, e.g. (vlans-enabled, vlans-disabled).
    pub boolean_pairs: Vec<(String, String)>,

    /// Comparison rules for scalar fields; unlisted fields use [`ScalarRule::Exact`].
    pub field_rules: IndexMap<String, ScalarRule>,

    /// Fields the device reports but refuses on create.
    pub read_only_fields: Vec<String>,

    /// Arguments placed first on every create line unless the caller sets the field.
    pub create_defaults: Vec<(String, String)>,
}

impl ResourceKind {
    pub fn new(name: impl Into<String>, object_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_path: object_path.into(),
            ..Default::default()
        }
    }

    /// Restrict the managed fields to a closed set.
    pub fn with_known_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_fields
            .get_or_insert_with(Vec::new)
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_noise_marker(mut self, marker: impl Into<String>) -> Self {
        self.noise_markers.push(marker.into());
        self
    }

    pub fn with_noise_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.noise_markers.extend(markers.into_iter().map(Into::into));
        self
    }

    pub fn with_noise_field(mut self, field: impl Into<String>) -> Self {
        self.noise_fields.push(field.into());
        self
    }

    pub fn with_noise_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.noise_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_composite(mut self, composite: CompositeField) -> Self {
        self.composites.push(composite);
        self
    }

    pub fn with_boolean_pair(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.boolean_pairs.push((on.into(), off.into()));
        self
    }

    pub fn with_field_rule(mut self, field: impl Into<String>, rule: ScalarRule) -> Self {
        self.field_rules.insert(field.into(), rule);
        self
    }

    pub fn with_read_only_field(mut self, field: impl Into<String>) -> Self {
        self.read_only_fields.push(field.into());
        self
    }

    pub fn with_create_default(
        mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.create_defaults.push((field.into(), value.into()));
        self
    }

    /// Whether a field takes part in comparison.
    pub fn is_known(&self, field: &str) -> bool {
        match &self.known_fields {
            None => true,
            Some(known) => known.iter().any(|f| f == field),
        }
    }

    /// Whether a (pager-stripped) listing line is noise: it starts with a
    /// noise marker as a whole word, or it lists a noise field.
    ///
    /// Field values are never inspected, so `pool /Common/ltm_pool` is data.
    pub fn is_noise(&self, line: &str) -> bool {
        let content = line.trim();
        let field = content.split_whitespace().next().unwrap_or_default();
        self.noise_fields.iter().any(|f| f == field)
            || self
                .noise_markers
                .iter()
                .any(|m| starts_with_word(content, m))
    }

    /// The composite opened by this (pager-stripped, trimmed) line, if any.
    pub fn composite_starting(&self, content: &str) -> Option<&CompositeField> {
        self.composites.iter().find(|c| c.starts_at(content))
    }

    pub fn composite(&self, field: &str) -> Option<&CompositeField> {
        self.composites.iter().find(|c| c.name == field)
    }

    /// The boolean pair this field belongs to, as (first, second).
    pub fn boolean_pair(&self, field: &str) -> Option<(&str, &str)> {
        self.boolean_pairs
            .iter()
            .find(|(a, b)| a == field || b == field)
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn rule(&self, field: &str) -> ScalarRule {
        self.field_rules.get(field).copied().unwrap_or_default()
    }

    pub fn is_read_only(&self, field: &str) -> bool {
        self.read_only_fields.iter().any(|f| f == field)
    }

    /// Reject desired fields outside a closed known-field set.
    ///
    /// Values are not inspected.
    pub fn check_desired(&self, desired: &DesiredConfig) -> Result<(), ConfigError> {
        if self.known_fields.is_none() {
            return Ok(());
        }
        for (field, _) in desired.iter() {
            if RESERVED_FIELDS.contains(&field) || self.is_known(field) {
                continue;
            }
            return Err(ConfigError::UnknownField {
                kind: self.name.clone(),
                field: field.to_string(),
            });
        }
        Ok(())
    }
}

/// `content` starts with `word` and the next character does not continue it.
fn starts_with_word(content: &str, word: &str) -> bool {
    match content.strip_prefix(word) {
        Some(rest) => !rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_port_rule() {
        let rule = ScalarRule::AddressPort;
        assert!(rule.equals("10.1.1.10%0:443", "10.1.1.10:443"));
        assert!(rule.equals("/Common/10.1.1.10%2:443", "10.1.1.10:443"));
        assert!(!rule.equals("10.1.1.10%0:80", "10.1.1.10:443"));
    }

    #[test]
    fn test_exact_rule_trims() {
        assert!(ScalarRule::Exact.equals(" 300 ", "300"));
        assert!(!ScalarRule::Exact.equals("300", "3000"));
    }

    #[test]
    fn test_open_known_fields() {
        let kind = ResourceKind::new("tcp", "ltm profile tcp");
        assert!(kind.is_known("anything"));
        let desired = DesiredConfig::new().with("name", "t1").with("whatever", 1);
        assert!(kind.check_desired(&desired).is_ok());
    }

    #[test]
    fn test_closed_known_fields() {
        let kind = ResourceKind::new("hash", "ltm persistence hash").with_known_fields(["timeout"]);
        assert!(kind.is_known("timeout"));
        assert!(!kind.is_known("idle-timeout"));

        let ok = DesiredConfig::new()
            .with("name", "h1")
            .with("state", "present")
            .with("timeout", 180);
        assert!(kind.check_desired(&ok).is_ok());

        let bad = ok.clone().with("idle-timeout", 5);
        assert!(matches!(
            kind.check_desired(&bad),
            Err(ConfigError::UnknownField { field, .. }) if field == "idle-timeout"
        ));
    }

    #[test]
    fn test_boolean_pair_lookup() {
        let kind = ResourceKind::new("vs", "ltm virtual")
            .with_boolean_pair("vlans-enabled", "vlans-disabled");
        assert_eq!(
            kind.boolean_pair("vlans-disabled"),
            Some(("vlans-enabled", "vlans-disabled"))
        );
        assert!(kind.boolean_pair("vlans").is_none());
    }

    #[test]
    fn test_noise_markers_match_line_start() {
        let kind = ResourceKind::new("vs", "ltm virtual")
            .with_noise_markers(["(END)", "}", "ltm"])
            .with_noise_marker("Last login");
        assert!(kind.is_noise("(END)"));
        assert!(kind.is_noise("Last login: Tue Oct 13 09:12:44 2026 from 10.0.0.5"));
        assert!(kind.is_noise("}"));
        assert!(kind.is_noise("ltm virtual other_vs {"));
        assert!(!kind.is_noise("    pool /Common/ltm_pool_app"));
        assert!(!kind.is_noise("ltm_pool_app"));
        assert!(!kind.is_noise("    description \"see (END) of page\""));
    }

    #[test]
    fn test_noise_fields_match_field_name() {
        let kind = ResourceKind::new("tcp", "ltm profile tcp")
            .with_noise_fields(["description", "defaults-from"]);
        assert!(kind.is_noise("    defaults-from /Common/tcp"));
        assert!(kind.is_noise("description none"));
        assert!(!kind.is_noise("    pool /Common/description_pool"));
        assert!(!kind.is_noise("    defaults-from-x 1"));
    }

    #[test]
    fn test_deserialize_kind() {
        let kind: ResourceKind = serde_json::from_str(
            r#"{
                "name": "fastl4",
                "object-path": "ltm profile fastl4",
                "noise-markers": ["END", "}"],
                "noise-fields": ["description"],
                "boolean-pairs": [["enabled", "disabled"]],
                "field-rules": {"destination": "address-port"}
            }"#,
        )
        .unwrap();
        assert_eq!(kind.object_path, "ltm profile fastl4");
        assert!(kind.is_noise("description none"));
        assert!(kind.known_fields.is_none());
        assert_eq!(kind.rule("destination"), ScalarRule::AddressPort);
        assert_eq!(kind.boolean_pair("disabled"), Some(("enabled", "disabled")));
    }
}

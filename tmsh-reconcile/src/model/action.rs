//! Decided changes.

use std::fmt;

/// One field-level change for a modify action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDirective {
    /// Field name as the device spells it.
    pub field: String,
    /// Ready-to-emit replacement value; `None` for bare flags.
    pub argument: Option<String>,
}

impl ChangeDirective {
    pub fn new(field: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            argument: Some(argument.into()),
        }
    }

    /// A directive that is just the field name (e.g. `vlans-enabled`).
    pub fn flag(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            argument: None,
        }
    }

    /// The command fragment for this directive.
    pub fn fragment(&self) -> String {
        match &self.argument {
            Some(arg) => format!("{} {}", self.field, arg),
            None => self.field.clone(),
        }
    }
}

impl fmt::Display for ChangeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment())
    }
}

/// The single decision produced by one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create,
    Modify(Vec<ChangeDirective>),
    Delete,
    NoOp,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }

    /// Directives of a modify, empty otherwise.
    pub fn directives(&self) -> &[ChangeDirective] {
        match self {
            Action::Modify(directives) => directives,
            _ => &[],
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Modify(_) => "modify",
            Action::Delete => "delete",
            Action::NoOp => "none",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Modify(directives) => write!(f, "modify ({} changes)", directives.len()),
            other => f.write_str(other.verb()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_fragments() {
        assert_eq!(
            ChangeDirective::new("idle-timeout", "300").fragment(),
            "idle-timeout 300"
        );
        assert_eq!(ChangeDirective::flag("vlans-enabled").fragment(), "vlans-enabled");
    }

    #[test]
    fn test_action_display() {
        let action = Action::Modify(vec![ChangeDirective::new("a", "1")]);
        assert_eq!(action.to_string(), "modify (1 changes)");
        assert_eq!(Action::NoOp.to_string(), "none");
        assert!(Action::Delete.directives().is_empty());
    }
}

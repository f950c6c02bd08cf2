//! Result of one reconciliation.

use std::fmt;
use std::time::Duration;

use crate::engine::Script;
use crate::model::Action;

/// What the reconciliation did to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Created,
    Updated,
    Deleted,
    Unchanged,
}

impl Status {
    pub fn from_action(action: &Action) -> Self {
        match action {
            Action::Create => Status::Created,
            Action::Modify(_) => Status::Updated,
            Action::Delete => Status::Deleted,
            Action::NoOp => Status::Unchanged,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Status::Created => "created",
            Status::Updated => "updated",
            Status::Deleted => "deleted",
            Status::Unchanged => "unchanged",
        };
        f.write_str(word)
    }
}

/// Outcome of [`Reconciler::reconcile`](super::Reconciler::reconcile).
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Resource kind name.
    pub kind: String,

    /// Object name.
    pub name: String,

    /// The decided action.
    pub action: Action,

    pub status: Status,

    /// Whether the object existed before the call.
    pub existed: bool,

    /// The apply script, if one was sent.
    pub script: Option<Script>,

    /// Raw device reply: the apply reply, or the query reply for no-ops.
    pub reply: Vec<String>,

    /// Wall time of the whole call.
    pub elapsed: Duration,
}

impl Outcome {
    /// Whether the device configuration was changed.
    pub fn changed(&self) -> bool {
        self.status != Status::Unchanged
    }

    /// One-line human readable summary.
    pub fn message(&self) -> String {
        match &self.action {
            Action::Modify(directives) => {
                let fields: Vec<&str> = directives.iter().map(|d| d.field.as_str()).collect();
                format!(
                    "{} {} '{}' ({})",
                    self.status,
                    self.kind,
                    self.name,
                    fields.join(", ")
                )
            }
            _ => format!("{} {} '{}'", self.status, self.kind, self.name),
        }
    }

    /// The raw reply joined with newlines.
    pub fn reply_text(&self) -> String {
        self.reply.join("\n")
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeDirective;

    fn outcome(action: Action) -> Outcome {
        Outcome {
            kind: "tcp".into(),
            name: "t1".into(),
            status: Status::from_action(&action),
            action,
            existed: true,
            script: None,
            reply: vec![],
            elapsed: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(outcome(Action::Create).message(), "created tcp 't1'");
        assert_eq!(outcome(Action::NoOp).message(), "unchanged tcp 't1'");
        let modify = Action::Modify(vec![
            ChangeDirective::new("idle-timeout", "300"),
            ChangeDirective::new("nagle", "disabled"),
        ]);
        assert_eq!(
            outcome(modify).message(),
            "updated tcp 't1' (idle-timeout, nagle)"
        );
    }

    #[test]
    fn test_changed() {
        assert!(outcome(Action::Delete).changed());
        assert!(!outcome(Action::NoOp).changed());
    }
}

//! Rendering of actions into command scripts.

use std::fmt;

use crate::error::ConfigError;
use crate::model::{Action, DesiredConfig};
use crate::resource::{Dialect, RenderPhase, ResourceKind};

/// Ordered lines submitted to the device in one round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub lines: Vec<String>,
    verb: usize,
}

impl Script {
    /// The line carrying the verb (`list`, `create`, `modify`, `delete`).
    pub fn verb_line(&self) -> Option<&str> {
        self.lines.get(self.verb).map(String::as_str)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Fixed slots of every script. Each slot has a value before rendering.
#[derive(Debug)]
struct CommandFrame {
    preamble: String,
    partition: String,
    object_path: Option<String>,
    verb: String,
    trailer: Vec<String>,
}

impl CommandFrame {
    fn into_script(self) -> Script {
        let mut lines = vec![self.preamble, self.partition];
        lines.extend(self.object_path);
        let verb = lines.len();
        lines.push(self.verb);
        lines.extend(self.trailer);
        Script { lines, verb }
    }
}

/// Renders queries and actions for one kind in one dialect.
///
/// Values are emitted as given; nothing is validated here.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    kind: &'a ResourceKind,
    dialect: &'a Dialect,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(kind: &'a ResourceKind, dialect: &'a Dialect) -> Self {
        Self { kind, dialect }
    }

    /// The describe query, followed by lines that page through and then
    /// quit the pager.
    pub fn query(&self, desired: &DesiredConfig) -> Result<Script, ConfigError> {
        let name = desired.require_name()?;
        let mut verb = format!("{} {} {}", self.dialect.list_verb, self.kind.object_path, name);
        if !self.dialect.list_suffix.is_empty() {
            verb.push(' ');
            verb.push_str(&self.dialect.list_suffix);
        }
        Ok(CommandFrame {
            preamble: self.dialect.mode_switch.clone(),
            partition: self.dialect.partition_line(desired.partition()),
            object_path: None,
            verb,
            trailer: self.dialect.pager_trailer(),
        }
        .into_script())
    }

    /// The apply script for `action`, or `None` for [`Action::NoOp`].
    pub fn render(
        &self,
        action: &Action,
        desired: &DesiredConfig,
    ) -> Result<Option<Script>, ConfigError> {
        let name = desired.require_name()?;
        let verb = match action {
            Action::NoOp => return Ok(None),
            Action::Create => join_verb("create", name, self.create_arguments(desired)?),
            Action::Modify(directives) => join_verb(
                "modify",
                name,
                directives.iter().map(|d| d.fragment()).collect(),
            ),
            Action::Delete => join_verb("delete", name, Vec::new()),
        };
        Ok(Some(
            CommandFrame {
                preamble: self.dialect.mode_switch.clone(),
                partition: self.dialect.partition_line(desired.partition()),
                object_path: Some(self.kind.object_path.clone()),
                verb,
                trailer: Vec::new(),
            }
            .into_script(),
        ))
    }

    /// Arguments of a create line, in desired order after the kind's defaults.
    fn create_arguments(&self, desired: &DesiredConfig) -> Result<Vec<String>, ConfigError> {
        let state = desired.state()?;
        let mut args = Vec::new();

        for (field, value) in &self.kind.create_defaults {
            if !desired.contains(field) {
                args.push(format!("{field} {value}"));
            }
        }

        for (field, value) in desired.managed_fields() {
            if self.kind.is_read_only(field) {
                continue;
            }
            if self.kind.boolean_pair(field).is_some() {
                if value.is_truthy() {
                    args.push(field.to_string());
                }
                continue;
            }
            match self.kind.composite(field) {
                Some(composite) => args.push(format!(
                    "{} {}",
                    field,
                    composite.render_argument(value, RenderPhase::Create)
                )),
                None => args.push(format!("{} {}", field, value.render())),
            }
        }

        if let Some(flag) = state.admin_flag() {
            if self.kind.boolean_pair(flag).is_some() && !desired.contains(flag) {
                args.push(flag.to_string());
            }
        }
        Ok(args)
    }
}

fn join_verb(verb: &str, name: &str, args: Vec<String>) -> String {
    let mut line = format!("{verb} {name}");
    for arg in args {
        line.push(' ');
        line.push_str(&arg);
    }
    line
}

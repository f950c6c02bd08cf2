//! Command-language dialect of the appliance shell.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `[admin@bigip:Active:Standalone] ~ #` and
/// `admin@(bigip)(cfg-sync Standalone)(Active)(/Common)(tmos)#`.
static PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?[A-Za-z0-9_.-]+@[^#]*#").unwrap());

/// Device-wide syntax shared by every resource kind.
///
/// The default is the F5 `tmsh` dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Dialect {
    /// Dialect name.
    pub name: String,

    /// Line that enters the command language from the login shell.
    pub mode_switch: String,

    /// Keyword that changes the working partition.
    pub partition_command: String,

    /// Prefix joined to the partition name (e.g. "/" gives `cd /Common`).
    pub partition_prefix: String,

    /// Verb of the describe query.
    pub list_verb: String,

    /// Trailing argument of the describe query.
    pub list_suffix: String,

    /// Blank lines sent after the query to page through long listings.
    pub pager_advance_lines: usize,

    /// Line that leaves the pager once the listing has been paged through.
    /// Empty sends nothing.
    pub pager_quit: String,

    /// Substring identifying a pager-truncated line.
    pub pager_marker: String,

    /// Phrase the device prints when the object does not exist.
    pub not_found_phrase: String,

    /// Reply substrings that mean an apply was rejected.
    pub failed_when_contains: Vec<String>,
}

impl Dialect {
    /// The F5 `tmsh` dialect.
    pub fn tmsh() -> Self {
        Self {
            name: "tmsh".to_string(),
            mode_switch: "tmsh".to_string(),
            partition_command: "cd".to_string(),
            partition_prefix: "/".to_string(),
            list_verb: "list".to_string(),
            list_suffix: "all-properties".to_string(),
            pager_advance_lines: 3,
            pager_quit: "q".to_string(),
            pager_marker: "(less".to_string(),
            not_found_phrase: "not found".to_string(),
            failed_when_contains: vec![],
        }
        .with_failure_pattern("Syntax Error")
        .with_failure_pattern("Configuration error")
        .with_failure_pattern("Unexpected Error")
        .with_failure_pattern("Data Input Error")
        .with_failure_pattern("was not found")
        .with_failure_pattern("already exists")
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    pub fn with_pager_advance_lines(mut self, lines: usize) -> Self {
        self.pager_advance_lines = lines;
        self
    }

    pub fn with_pager_quit(mut self, quit: impl Into<String>) -> Self {
        self.pager_quit = quit.into();
        self
    }

    /// Lines sent after the describe query.
    pub fn pager_trailer(&self) -> Vec<String> {
        let mut trailer = vec![" ".to_string(); self.pager_advance_lines];
        if !self.pager_quit.is_empty() {
            trailer.push(self.pager_quit.clone());
        }
        trailer
    }

    /// The partition-switch line, e.g. `cd /Common`.
    pub fn partition_line(&self, partition: &str) -> String {
        format!(
            "{} {}{}",
            self.partition_command,
            self.partition_prefix,
            partition.trim().trim_start_matches('/')
        )
    }

    /// The first failure pattern found in an apply reply.
    pub fn detect_failure<S: AsRef<str>>(&self, reply: &[S]) -> Option<String> {
        reply.iter().find_map(|line| {
            let line = line.as_ref();
            self.failed_when_contains
                .iter()
                .find(|p| line.contains(p.as_str()))
                .map(|_| line.trim().to_string())
        })
    }

    /// Check that the shell took `verb_line`: the line is echoed back and a
    /// prompt follows the echo. Returns what is missing otherwise.
    ///
    /// A shell still inside the pager swallows the script without echoing it.
    pub fn confirm_apply<S: AsRef<str>>(
        &self,
        reply: &[S],
        verb_line: &str,
    ) -> Result<(), String> {
        let verb_line = verb_line.trim();
        let Some(echo) = reply
            .iter()
            .position(|line| line.as_ref().contains(verb_line))
        else {
            return Err(format!("'{verb_line}' was not echoed by the shell"));
        };
        if reply[echo + 1..].iter().any(|line| self.is_prompt(line.as_ref())) {
            Ok(())
        } else {
            Err(format!("no prompt after '{verb_line}'"))
        }
    }

    /// Whether a line starts with a login-shell or command-language prompt.
    pub fn is_prompt(&self, line: &str) -> bool {
        PROMPT.is_match(line.trim_start())
    }

    pub fn is_not_found(&self, line: &str) -> bool {
        line.contains(self.not_found_phrase.as_str())
    }

    /// Text of a line with any pager prefix removed, trimmed.
    ///
    /// A pager-truncated line is split on whitespace runs; the marker and its
    /// percentage occupy the first two tokens and content starts at the third.
    pub fn content<'a>(&self, line: &'a str) -> &'a str {
        let line = line.trim();
        if self.pager_marker.is_empty() || !line.contains(self.pager_marker.as_str()) {
            return line;
        }
        skip_tokens(line, 2)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::tmsh()
    }
}

/// The remainder of `s` after `n` whitespace-separated tokens, trimmed.
fn skip_tokens(s: &str, n: usize) -> &str {
    let mut rest = s.trim_start();
    for _ in 0..n {
        match rest.find(char::is_whitespace) {
            Some(end) => rest = rest[end..].trim_start(),
            None => return "",
        }
    }
    rest.trim_end()
}

//! Scripted in-memory session for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{Connector, DeviceSession};
use crate::error::{ChannelError, Result, TransportError};

/// Prompt printed by the scripted shell.
pub const PROMPT: &str = "admin@(bigip)(cfg-sync Standalone)(Active)(/Common)(tmos)# ";

/// Pager end line, and the line that leaves the pager.
const PAGER_END: &str = "(END)";
const PAGER_QUIT: &str = "q";

enum Step {
    Reply(Vec<String>),
    /// A listing long enough to open the pager.
    Paged(Vec<String>),
    /// Echo every line after a prompt, as a shell at its prompt does.
    Echo,
    Fail,
}

#[derive(Default)]
struct State {
    steps: VecDeque<Step>,
    scripts: Vec<Vec<String>>,
    opens: usize,
    closes: usize,
    fail_open: bool,
    fail_close: bool,
    in_pager: bool,
}

impl State {
    /// Feed `script` to the shell. Inside the pager nothing is echoed and
    /// every line but the quit line is swallowed.
    fn echo(&mut self, script: &[String]) -> Vec<String> {
        let mut reply = Vec::new();
        for line in script {
            if self.in_pager {
                self.in_pager = line != PAGER_QUIT;
                continue;
            }
            reply.push(format!("{PROMPT}{line}"));
        }
        reply.push(if self.in_pager { PAGER_END } else { PROMPT }.to_string());
        reply
    }
}

/// Hands out sessions that answer each `run` with the next queued reply.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    state: Arc<Mutex<State>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply to the next script.
    pub fn reply(self, lines: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .steps
            .push_back(Step::Reply(lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    /// Queue a paged listing for the next script. The pager stays open
    /// unless that script quits it.
    pub fn paged(self, lines: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .steps
            .push_back(Step::Paged(lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    /// Queue an echo of the next script.
    pub fn echo(self) -> Self {
        self.state.lock().unwrap().steps.push_back(Step::Echo);
        self
    }

    /// Queue a channel failure for the next script.
    pub fn fail_run(self) -> Self {
        self.state.lock().unwrap().steps.push_back(Step::Fail);
        self
    }

    pub fn fail_open(self) -> Self {
        self.state.lock().unwrap().fail_open = true;
        self
    }

    pub fn fail_close(self) -> Self {
        self.state.lock().unwrap().fail_close = true;
        self
    }

    /// Every script received, in order.
    pub fn scripts(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().scripts.clone()
    }

    pub fn opens(&self) -> usize {
        self.state.lock().unwrap().opens
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession> {
        let mut state = self.state.lock().unwrap();
        state.opens += 1;
        if state.fail_open {
            return Err(TransportError::AuthenticationFailed {
                user: "admin".to_string(),
            }
            .into());
        }
        Ok(ScriptedSession {
            state: self.state.clone(),
        })
    }
}

pub struct ScriptedSession {
    state: Arc<Mutex<State>>,
}

impl DeviceSession for ScriptedSession {
    async fn run(&mut self, script: &[String]) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.scripts.push(script.to_vec());
        match state.steps.pop_front() {
            Some(Step::Reply(lines)) => Ok(lines),
            Some(Step::Paged(mut lines)) => {
                lines.push(PAGER_END.to_string());
                match script.iter().position(|line| line == PAGER_QUIT) {
                    Some(quit) => lines.extend(state.echo(&script[quit + 1..])),
                    None => state.in_pager = true,
                }
                Ok(lines)
            }
            Some(Step::Echo) => Ok(state.echo(script)),
            Some(Step::Fail) | None => Err(ChannelError::Closed {
                sent: 1,
                total: script.len(),
            }
            .into()),
        }
    }

    async fn close(self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.closes += 1;
        if state.fail_close {
            return Err(TransportError::Timeout(std::time::Duration::from_secs(1)).into());
        }
        Ok(())
    }
}

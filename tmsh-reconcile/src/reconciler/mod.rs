//! Reconciliation state machine.
//!
//! ```text
//!            ┌──────────┐  not found   ┌────────────────┐
//!  start ───►│ Querying ├─────────────►│ AbsentOnDevice ├──► Create | NoOp
//!            └────┬─────┘              └────────────────┘
//!                 │ header / fields    ┌─────────────────┐
//!                 └───────────────────►│ PresentOnDevice ├─► Modify | Delete | NoOp
//!                                      └─────────────────┘
//! ```
//!
//! One session per call, at most two round-trips (query, then apply). The
//! session is closed on every exit path. Nothing is retried.

mod builder;
mod outcome;

pub use builder::ReconcilerBuilder;
pub use outcome::{Outcome, Status};

use std::time::Instant;

use log::{debug, info, warn};

use crate::engine::{CommandBuilder, FieldExtractor, LineFilter, Script, diff};
use crate::error::{ReconcileError, Result};
use crate::model::{Action, DesiredConfig, ObservedConfig};
use crate::resource::{Dialect, ResourceKind};
use crate::session::{Connector, DeviceSession};

/// Decision for one listing, before anything is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub observed: ObservedConfig,
    pub action: Action,
    /// Apply script; `None` for no-ops.
    pub script: Option<Script>,
}

/// Reconciles objects of one kind on one appliance.
pub struct Reconciler<C: Connector> {
    connector: C,
    kind: ResourceKind,
    dialect: Dialect,
}

impl<C: Connector> Reconciler<C> {
    pub fn new(connector: C, kind: ResourceKind) -> Self {
        Self {
            connector,
            kind,
            dialect: Dialect::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// The describe query for `desired`.
    pub fn query(&self, desired: &DesiredConfig) -> Result<Script> {
        Ok(CommandBuilder::new(&self.kind, &self.dialect).query(desired)?)
    }

    /// Decide what `listing` requires, without touching the device.
    pub fn plan<S: AsRef<str>>(&self, desired: &DesiredConfig, listing: &[S]) -> Result<Plan> {
        let name = desired.require_name()?;
        let filter = LineFilter::new(&self.kind, &self.dialect, name);
        let observed = FieldExtractor::new(filter).extract(listing, name)?;
        let action = diff(&self.kind, desired, &observed)?;
        let script = CommandBuilder::new(&self.kind, &self.dialect).render(&action, desired)?;
        Ok(Plan {
            observed,
            action,
            script,
        })
    }

    /// Bring one object to its desired state.
    ///
    /// Caller input is checked before any session is opened. An apply whose
    /// reply carries a failure pattern, or that the shell never confirmed by
    /// echoing the verb line and returning to its prompt, is reported as
    /// [`ReconcileError::PartialApply`] with the raw reply; re-query before
    /// trying again.
    pub async fn reconcile(&self, desired: &DesiredConfig) -> Result<Outcome> {
        let start = Instant::now();
        let name = desired.require_name()?.to_string();
        desired.state()?;
        self.kind.check_desired(desired)?;
        let query = self.query(desired)?;

        let mut session = self.connector.open().await?;
        let result = self.converge(&mut session, desired, &query).await;
        let closed = session.close().await;

        let (plan, reply) = match (result, closed) {
            (Ok(done), Ok(())) => done,
            (Ok(_), Err(close_err)) => return Err(close_err),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(close_err)) => {
                warn!("{} '{}': session close failed: {}", self.kind.name, name, close_err);
                return Err(e);
            }
        };

        Ok(Outcome {
            kind: self.kind.name.clone(),
            name,
            status: Status::from_action(&plan.action),
            existed: !plan.observed.is_absent(),
            action: plan.action,
            script: plan.script,
            reply,
            elapsed: start.elapsed(),
        })
    }

    async fn converge(
        &self,
        session: &mut C::Session,
        desired: &DesiredConfig,
        query: &Script,
    ) -> Result<(Plan, Vec<String>)> {
        let name = desired.name().unwrap_or_default();
        let listing = session.run(&query.lines).await?;
        let plan = self.plan(desired, &listing)?;
        info!("{} '{}': {}", self.kind.name, name, plan.action);

        let Some(script) = &plan.script else {
            return Ok((plan, listing));
        };
        debug!("apply:\n{}", script);
        let reply = session.run(&script.lines).await?;

        let verdict = match self.dialect.detect_failure(&reply) {
            Some(failure) => Err(failure),
            None => self
                .dialect
                .confirm_apply(&reply, script.verb_line().unwrap_or_default()),
        };
        if let Err(failure) = verdict {
            warn!("{} '{}': apply failed: {}", self.kind.name, name, failure);
            return Err(ReconcileError::PartialApply {
                name: name.to_string(),
                action: plan.action.clone(),
                failure,
                reply,
            }
            .into());
        }
        Ok((plan, reply))
    }
}

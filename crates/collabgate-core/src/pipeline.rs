//! Access-request pipeline
//!
//! `Start → Extracted → Probed → Resolved → {Executing → Done | Aborted}`.
//! One terminal pass per trigger; nothing is retried or retained.

use crate::config::AccessConfig;
use crate::error::Result;
use crate::executor::ActionExecutor;
use crate::mention::extract_mention;
use crate::probe::probe_collaborator;
use crate::resolver::{precheck, resolve};
use crate::traits::CollaboratorApi;
use crate::types::{ActionPlan, RunOutcome, TriggerEvent};

/// Pipeline bound to a service and an explicit configuration
pub struct AccessPipeline<'a, A> {
    api: &'a A,
    config: &'a AccessConfig,
}

impl<'a, A: CollaboratorApi> AccessPipeline<'a, A> {
    /// Create a pipeline
    pub fn new(api: &'a A, config: &'a AccessConfig) -> Self {
        Self { api, config }
    }

    /// Extract, probe and resolve without executing anything.
    ///
    /// The owner self-mention short-circuits before the probe call.
    /// Fails only when the title has no mention.
    pub async fn plan(&self, event: &TriggerEvent) -> Result<ActionPlan> {
        let username = extract_mention(&event.title)?;
        let owner = self.config.repository.owner.as_str();

        tracing::info!(
            repository = %self.config.repository,
            username,
            owner,
            issue = event.issue_number,
            "parsed event values"
        );

        if let Some(plan) = precheck(username, owner) {
            tracing::info!("mentioned user is the repository owner; nothing to do");
            return Ok(plan);
        }

        let probe = probe_collaborator(self.api, &self.config.repository, username).await;
        let plan = resolve(username, owner, probe);
        tracing::info!(plan = plan.name(), "resolved action plan");
        Ok(plan)
    }

    /// Run the full pipeline for one trigger event
    pub async fn run(&self, event: &TriggerEvent) -> Result<RunOutcome> {
        let plan = self.plan(event).await?;

        match plan {
            ActionPlan::AbortSelfRequest => Ok(RunOutcome::SelfRequestAborted),
            ActionPlan::AbortProbeFailure(reason) => {
                tracing::error!(%reason, "could not determine collaborator status");
                Ok(RunOutcome::ProbeFailed(reason))
            }
            plan @ (ActionPlan::GrantAndClose(_) | ActionPlan::NotifyDuplicateAndClose(_)) => {
                let report = ActionExecutor::new(self.api, self.config)
                    .execute(plan, event)
                    .await;
                Ok(RunOutcome::Completed(report))
            }
        }
    }
}

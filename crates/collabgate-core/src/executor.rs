//! Action executor
//!
//! Runs an [`ActionPlan`] as an ordered sequence of awaited calls. A failed
//! call is logged with its cause and recorded; later steps still run unless
//! the [`ExecutionPolicy`] says otherwise. Nothing is rolled back.

use crate::config::AccessConfig;
use crate::error::Result;
use crate::traits::CollaboratorApi;
use crate::types::{
    ActionPlan, ActionStep, ExecutionPolicy, ExecutionReport, StepOutcome, StepResult,
    TriggerEvent,
};

/// Executes plans against a collaborator service
pub struct ActionExecutor<'a, A> {
    api: &'a A,
    config: &'a AccessConfig,
}

impl<'a, A: CollaboratorApi> ActionExecutor<'a, A> {
    /// Create an executor
    pub fn new(api: &'a A, config: &'a AccessConfig) -> Self {
        Self { api, config }
    }

    /// Execute `plan` for `event`.
    ///
    /// Abort plans perform zero calls and return an empty report.
    pub async fn execute(&self, plan: ActionPlan, event: &TriggerEvent) -> ExecutionReport {
        let mut report = ExecutionReport::new(plan.clone());

        match &plan {
            ActionPlan::GrantAndClose(username) => {
                self.grant_and_close(username, event.issue_number, &mut report)
                    .await;
            }
            ActionPlan::NotifyDuplicateAndClose(username) => {
                self.notify_duplicate_and_close(username, event.issue_number, &mut report)
                    .await;
            }
            ActionPlan::AbortSelfRequest | ActionPlan::AbortProbeFailure(_) => {}
        }

        if report.failed_count() > 0 {
            tracing::warn!(
                plan = plan.name(),
                failed = report.failed_count(),
                skipped = report.skipped_count(),
                "plan finished with failed steps"
            );
        }
        report
    }

    async fn grant_and_close(&self, username: &str, issue: u64, report: &mut ExecutionReport) {
        let repo = &self.config.repository;

        let granted = self
            .api
            .add_collaborator(&repo.owner, &repo.name, username, self.config.permission)
            .await;
        let grant_failed = granted.is_err();
        record(report, ActionStep::GrantAccess, granted);

        if grant_failed && self.config.policy == ExecutionPolicy::HaltOnGrantFailure {
            for step in [
                ActionStep::PostComment,
                ActionStep::ApplyLabel,
                ActionStep::CloseIssue,
            ] {
                report.steps.push(StepOutcome {
                    step,
                    result: StepResult::Skipped,
                });
            }
            return;
        }

        let comment = self.config.render_granted_comment(username);
        self.comment_label_close(issue, &comment, &self.config.granted_label, report)
            .await;
    }

    async fn notify_duplicate_and_close(
        &self,
        username: &str,
        issue: u64,
        report: &mut ExecutionReport,
    ) {
        let comment = self.config.render_duplicate_comment(username);
        self.comment_label_close(issue, &comment, &self.config.duplicate_label, report)
            .await;
    }

    async fn comment_label_close(
        &self,
        issue: u64,
        comment: &str,
        label: &str,
        report: &mut ExecutionReport,
    ) {
        let repo = &self.config.repository;

        let commented = self
            .api
            .create_comment(&repo.owner, &repo.name, issue, comment)
            .await;
        record(report, ActionStep::PostComment, commented);

        let labels = [label];
        let labelled = self
            .api
            .add_labels(&repo.owner, &repo.name, issue, &labels)
            .await;
        record(report, ActionStep::ApplyLabel, labelled);

        let closed = self.api.close_issue(&repo.owner, &repo.name, issue).await;
        record(report, ActionStep::CloseIssue, closed);
    }
}

fn record(report: &mut ExecutionReport, step: ActionStep, result: Result<()>) {
    let result = match result {
        Ok(()) => {
            tracing::info!(step = step.as_str(), "step succeeded");
            StepResult::Ok
        }
        Err(e) => {
            tracing::warn!(step = step.as_str(), error = %e, "step failed; continuing");
            StepResult::Failed(e.to_string())
        }
    };
    report.steps.push(StepOutcome { step, result });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ApiCall, MockCollaboratorApi};
    use crate::types::Permission;
    use assert_matches::assert_matches;

    fn event() -> TriggerEvent {
        TriggerEvent::new("Please add @alice-dev", 7)
    }

    fn steps(report: &ExecutionReport) -> Vec<ActionStep> {
        report.steps.iter().map(|s| s.step).collect()
    }

    #[tokio::test]
    async fn test_grant_sequence_order() {
        let api = MockCollaboratorApi::not_found();
        let config = AccessConfig::default();
        let report = ActionExecutor::new(&api, &config)
            .execute(ActionPlan::GrantAndClose("alice-dev".into()), &event())
            .await;

        assert!(report.all_succeeded());
        assert_eq!(
            steps(&report),
            vec![
                ActionStep::GrantAccess,
                ActionStep::PostComment,
                ActionStep::ApplyLabel,
                ActionStep::CloseIssue
            ]
        );

        let calls = api.calls();
        assert_eq!(
            calls[0],
            ApiCall::AddCollaborator {
                owner: "community".into(),
                repo: "maintainers".into(),
                username: "alice-dev".into(),
                permission: Permission::Pull,
            }
        );
        assert_matches!(&calls[1], ApiCall::CreateComment { issue_number: 7, body } if body.starts_with("@alice-dev has been added"));
        assert_eq!(
            calls[2],
            ApiCall::AddLabels {
                issue_number: 7,
                labels: vec!["collaborator added".into()]
            }
        );
        assert_eq!(calls[3], ApiCall::CloseIssue { issue_number: 7 });
    }

    #[tokio::test]
    async fn test_duplicate_sequence_has_no_grant() {
        let api = MockCollaboratorApi::member();
        let config = AccessConfig::default();
        let report = ActionExecutor::new(&api, &config)
            .execute(ActionPlan::NotifyDuplicateAndClose("bob".into()), &event())
            .await;

        assert_eq!(
            steps(&report),
            vec![
                ActionStep::PostComment,
                ActionStep::ApplyLabel,
                ActionStep::CloseIssue
            ]
        );
        assert!(api
            .calls()
            .iter()
            .all(|c| !matches!(c, ApiCall::AddCollaborator { .. })));
        assert_matches!(&api.calls()[0], ApiCall::CreateComment { body, .. } if body == "@bob is already a member of this repository.");
    }

    #[tokio::test]
    async fn test_abort_plans_make_no_calls() {
        let api = MockCollaboratorApi::not_found();
        let config = AccessConfig::default();
        let executor = ActionExecutor::new(&api, &config);

        let report = executor.execute(ActionPlan::AbortSelfRequest, &event()).await;
        assert!(report.steps.is_empty());
        let report = executor
            .execute(ActionPlan::AbortProbeFailure("x".into()), &event())
            .await;
        assert!(report.steps.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_grant_continues_by_default() {
        let api = MockCollaboratorApi::not_found().fail_step(ActionStep::GrantAccess);
        let config = AccessConfig::default();
        let report = ActionExecutor::new(&api, &config)
            .execute(ActionPlan::GrantAndClose("alice-dev".into()), &event())
            .await;

        assert_eq!(report.failed_count(), 1);
        assert_matches!(report.steps[0].result, StepResult::Failed(_));
        assert_eq!(report.steps[1..].iter().filter(|s| s.result == StepResult::Ok).count(), 3);
        assert_eq!(api.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_middle_step_does_not_stop_close() {
        let api = MockCollaboratorApi::member().fail_step(ActionStep::PostComment);
        let config = AccessConfig::default();
        let report = ActionExecutor::new(&api, &config)
            .execute(ActionPlan::NotifyDuplicateAndClose("bob".into()), &event())
            .await;

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.steps[2].step, ActionStep::CloseIssue);
        assert_eq!(report.steps[2].result, StepResult::Ok);
    }

    #[tokio::test]
    async fn test_halt_on_grant_failure_skips_rest() {
        let api = MockCollaboratorApi::not_found().fail_step(ActionStep::GrantAccess);
        let config = AccessConfig {
            policy: ExecutionPolicy::HaltOnGrantFailure,
            ..Default::default()
        };
        let report = ActionExecutor::new(&api, &config)
            .execute(ActionPlan::GrantAndClose("alice-dev".into()), &event())
            .await;

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 3);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_labels_and_permission() {
        let api = MockCollaboratorApi::not_found();
        let config = AccessConfig {
            permission: Permission::Triage,
            granted_label: "access-granted".into(),
            ..Default::default()
        };
        ActionExecutor::new(&api, &config)
            .execute(ActionPlan::GrantAndClose("x".into()), &event())
            .await;
        let calls = api.calls();
        assert_matches!(&calls[0], ApiCall::AddCollaborator { permission: Permission::Triage, .. });
        assert_matches!(&calls[2], ApiCall::AddLabels { labels, .. } if labels == &vec!["access-granted".to_string()]);
    }
}

//! In-memory collaborator service for tests and benchmarks
//!
//! Records every call in order and answers from fixed, configurable results.

use crate::error::{Error, Result};
use crate::traits::CollaboratorApi;
use crate::types::{ActionStep, CollaboratorCheck, Permission};
use parking_lot::Mutex;
use std::future::{ready, Future};

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// Membership check
    CheckCollaborator {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Checked login
        username: String,
    },
    /// Grant
    AddCollaborator {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Granted login
        username: String,
        /// Granted level
        permission: Permission,
    },
    /// Issue comment
    CreateComment {
        /// Issue number
        issue_number: u64,
        /// Comment body
        body: String,
    },
    /// Issue labels
    AddLabels {
        /// Issue number
        issue_number: u64,
        /// Applied labels
        labels: Vec<String>,
    },
    /// Issue close
    CloseIssue {
        /// Issue number
        issue_number: u64,
    },
}

impl ApiCall {
    /// Executor step this call belongs to; `None` for the read-only probe
    pub const fn step(&self) -> Option<ActionStep> {
        match self {
            Self::CheckCollaborator { .. } => None,
            Self::AddCollaborator { .. } => Some(ActionStep::GrantAccess),
            Self::CreateComment { .. } => Some(ActionStep::PostComment),
            Self::AddLabels { .. } => Some(ActionStep::ApplyLabel),
            Self::CloseIssue { .. } => Some(ActionStep::CloseIssue),
        }
    }

    /// True for calls that change remote state
    pub const fn is_mutating(&self) -> bool {
        self.step().is_some()
    }
}

/// Scripted answer to the membership check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCheck {
    /// 204
    Member,
    /// 404
    NotFound,
    /// Any failure, surfaced as [`Error::Http`]
    Fail(String),
}

/// Recording in-memory implementation of [`CollaboratorApi`]
#[derive(Debug)]
pub struct MockCollaboratorApi {
    check: MockCheck,
    failing_steps: Vec<ActionStep>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockCollaboratorApi {
    /// Service answering the membership check with `check`
    pub fn new(check: MockCheck) -> Self {
        Self {
            check,
            failing_steps: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// User is not a collaborator
    pub fn not_found() -> Self {
        Self::new(MockCheck::NotFound)
    }

    /// User is already a collaborator
    pub fn member() -> Self {
        Self::new(MockCheck::Member)
    }

    /// Membership check fails with `reason`
    pub fn failing_lookup(reason: impl Into<String>) -> Self {
        Self::new(MockCheck::Fail(reason.into()))
    }

    /// Make every call of `step` fail
    pub fn fail_step(mut self, step: ActionStep) -> Self {
        self.failing_steps.push(step);
        self
    }

    /// Snapshot of recorded calls in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    /// Recorded calls that change remote state
    pub fn mutating_calls(&self) -> Vec<ApiCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.is_mutating())
            .cloned()
            .collect()
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        let step = call.step();
        self.calls.lock().push(call);
        match step {
            Some(step) if self.failing_steps.contains(&step) => Err(Error::Http(format!(
                "{} returned 500 Internal Server Error: injected failure",
                step.as_str()
            ))),
            _ => Ok(()),
        }
    }
}

impl CollaboratorApi for MockCollaboratorApi {
    fn check_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
    ) -> impl Future<Output = Result<CollaboratorCheck>> + Send + 'a {
        let recorded = self.record(ApiCall::CheckCollaborator {
            owner: owner.to_string(),
            repo: repo.to_string(),
            username: username.to_string(),
        });
        let answer = recorded.and_then(|()| match &self.check {
            MockCheck::Member => Ok(CollaboratorCheck::MemberConfirmed),
            MockCheck::NotFound => Ok(CollaboratorCheck::NotFound),
            MockCheck::Fail(reason) => Err(Error::Http(reason.clone())),
        });
        ready(answer)
    }

    fn add_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
        permission: Permission,
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        ready(self.record(ApiCall::AddCollaborator {
            owner: owner.to_string(),
            repo: repo.to_string(),
            username: username.to_string(),
            permission,
        }))
    }

    fn create_comment<'a>(
        &'a self,
        _owner: &'a str,
        _repo: &'a str,
        issue_number: u64,
        body: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        ready(self.record(ApiCall::CreateComment {
            issue_number,
            body: body.to_string(),
        }))
    }

    fn add_labels<'a>(
        &'a self,
        _owner: &'a str,
        _repo: &'a str,
        issue_number: u64,
        labels: &'a [&'a str],
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        ready(self.record(ApiCall::AddLabels {
            issue_number,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }))
    }

    fn close_issue<'a>(
        &'a self,
        _owner: &'a str,
        _repo: &'a str,
        issue_number: u64,
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        ready(self.record(ApiCall::CloseIssue { issue_number }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order() {
        let api = MockCollaboratorApi::member();
        api.check_collaborator("o", "r", "u").await.unwrap();
        api.close_issue("o", "r", 9).await.unwrap();
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].is_mutating());
        assert_eq!(calls[1], ApiCall::CloseIssue { issue_number: 9 });
        assert_eq!(api.mutating_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_still_recorded() {
        let api = MockCollaboratorApi::not_found().fail_step(ActionStep::ApplyLabel);
        assert!(api.add_labels("o", "r", 1, &["x"]).await.is_err());
        assert_eq!(api.calls().len(), 1);
    }
}

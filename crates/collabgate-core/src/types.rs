//! Core type definitions for the access-request pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Triggering event record: one per invocation, never mutated.
///
/// The requesting actor is implicit: it is the user mentioned in `title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Free-text issue title containing the `@mention`
    pub title: String,
    /// Issue number the outcome is reported on
    pub issue_number: u64,
}

impl TriggerEvent {
    /// Build an event from a title and issue number
    pub fn new(title: impl Into<String>, issue_number: u64) -> Self {
        Self {
            title: title.into(),
            issue_number,
        }
    }
}

/// Repository whose collaborator list is managed.
///
/// Fixed deploy-time configuration, never derived from the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRepository {
    /// Repository owner (user or organization login)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl TargetRepository {
    /// Create a target repository reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl Default for TargetRepository {
    fn default() -> Self {
        Self::new("community", "maintainers")
    }
}

impl fmt::Display for TargetRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Permission level granted to a new collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Permission {
    /// Read access (`pull`)
    #[default]
    #[serde(alias = "read")]
    Pull,
    /// Triage access
    Triage,
    /// Write access (`push`)
    #[serde(alias = "write")]
    Push,
    /// Maintain access
    Maintain,
    /// Admin access
    Admin,
}

impl Permission {
    /// Wire name used by the collaborators endpoint
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Triage => "triage",
            Self::Push => "push",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }

    /// Parse a permission name, accepting the `read`/`write` aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pull" | "read" => Some(Self::Pull),
            "triage" => Some(Self::Triage),
            "push" | "write" => Some(Self::Push),
            "maintain" => Some(Self::Maintain),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Raw answer of the membership-check endpoint.
///
/// "Not found" is an expected answer, not an error; every other response
/// surfaces as `Err` from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorCheck {
    /// Membership confirmed (204 No Content)
    MemberConfirmed,
    /// User is not a collaborator (404 Not Found)
    NotFound,
}

/// Normalized collaborator status for one (repository, username) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// User already has collaborator access
    AlreadyCollaborator,
    /// User is not a collaborator
    NotCollaborator,
    /// Membership could not be determined
    LookupFailed(String),
}

/// The single terminal course of action selected for an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPlan {
    /// Grant access, acknowledge, label and close
    GrantAndClose(String),
    /// Report the duplicate request, label and close
    NotifyDuplicateAndClose(String),
    /// Requested user is the repository owner; do nothing
    AbortSelfRequest,
    /// Membership lookup failed; do nothing and report failure
    AbortProbeFailure(String),
}

impl ActionPlan {
    /// Short machine-readable name, used for action outputs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GrantAndClose(_) => "grant",
            Self::NotifyDuplicateAndClose(_) => "duplicate",
            Self::AbortSelfRequest => "self-request",
            Self::AbortProbeFailure(_) => "probe-failure",
        }
    }

    /// Username the plan acts on, if any
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::GrantAndClose(u) | Self::NotifyDuplicateAndClose(u) => Some(u),
            Self::AbortSelfRequest | Self::AbortProbeFailure(_) => None,
        }
    }

    /// Whether the plan performs no external calls
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::AbortSelfRequest | Self::AbortProbeFailure(_))
    }
}

/// One external call performed by the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActionStep {
    /// Add the user as a collaborator
    GrantAccess,
    /// Post a comment on the issue
    PostComment,
    /// Apply a status label
    ApplyLabel,
    /// Close the issue
    CloseIssue,
}

impl ActionStep {
    /// Get string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GrantAccess => "grant_access",
            Self::PostComment => "post_comment",
            Self::ApplyLabel => "apply_label",
            Self::CloseIssue => "close_issue",
        }
    }
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Call succeeded
    Ok,
    /// Call failed with the given cause
    Failed(String),
    /// Call was not attempted due to the execution policy
    Skipped,
}

/// Outcome of a single executed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Which call
    pub step: ActionStep,
    /// What happened
    pub result: StepResult,
}

/// How the executor reacts to a failed step.
///
/// `BestEffort` attempts every step regardless of earlier failures.
/// `HaltOnGrantFailure` skips acknowledgement, label and close when the grant
/// itself failed, so no success comment is posted for a grant that did not
/// happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionPolicy {
    /// Attempt every step (non-transactional)
    #[default]
    BestEffort,
    /// Skip remaining steps after a failed grant
    HaltOnGrantFailure,
}

/// Cumulative record of an executed plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Plan that was executed
    pub plan: ActionPlan,
    /// Steps in execution order
    pub steps: Vec<StepOutcome>,
}

impl ExecutionReport {
    /// Empty report for a plan
    pub fn new(plan: ActionPlan) -> Self {
        Self {
            plan,
            steps: Vec::with_capacity(4),
        }
    }

    /// Number of steps whose call failed
    pub fn failed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.result, StepResult::Failed(_)))
            .count()
    }

    /// Number of steps skipped by policy
    pub fn skipped_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.result == StepResult::Skipped)
            .count()
    }

    /// True when every step ran and succeeded
    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.result == StepResult::Ok)
    }
}

/// Terminal state of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A grant or duplicate plan was executed
    Completed(ExecutionReport),
    /// Mentioned user is the owner; nothing was done
    SelfRequestAborted,
    /// Membership lookup failed; nothing was done
    ProbeFailed(String),
}

impl RunOutcome {
    /// Process exit code for this outcome.
    ///
    /// Step failures inside a completed plan do not change the status.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Completed(_) | Self::SelfRequestAborted => 0,
            Self::ProbeFailed(_) => 1,
        }
    }
}

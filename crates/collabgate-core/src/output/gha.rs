//! GitHub Actions step outputs and workflow commands

use crate::error::Result;
use crate::types::{ActionPlan, RunOutcome, StepResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

const DELIM: &str = "COLLABGATE_EOF";

/// Escape a value for workflow commands and `$GITHUB_OUTPUT`
pub fn safe_output_escape(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::error::` workflow command marking the run as failed
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", safe_output_escape(message))
}

/// `::warning::` workflow command
pub fn warning_annotation(message: &str) -> String {
    format!("::warning::{}", safe_output_escape(message))
}

/// Per-step entry of a summary
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepSummary {
    /// Step name
    pub step: &'static str,
    /// `ok`, `failed` or `skipped`
    pub status: &'static str,
    /// Failure cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Flat, serializable view of one invocation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Plan name (`grant`, `duplicate`, `self-request`, `probe-failure`)
    pub plan: &'static str,
    /// Mentioned user, when the plan acts on one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Issue the run reported on
    pub issue_number: u64,
    /// Executed steps
    pub steps: Vec<StepSummary>,
    /// Number of failed steps
    pub failed_steps: usize,
    /// Probe failure cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Whether mutating calls were suppressed
    pub dry_run: bool,
}

impl RunSummary {
    /// Summarize a finished run
    pub fn from_outcome(outcome: &RunOutcome, username: Option<&str>, issue_number: u64) -> Self {
        match outcome {
            RunOutcome::Completed(report) => {
                let steps = report
                    .steps
                    .iter()
                    .map(|s| {
                        let (status, error) = match &s.result {
                            StepResult::Ok => ("ok", None),
                            StepResult::Failed(e) => ("failed", Some(e.clone())),
                            StepResult::Skipped => ("skipped", None),
                        };
                        StepSummary {
                            step: s.step.as_str(),
                            status,
                            error,
                        }
                    })
                    .collect();
                Self {
                    plan: report.plan.name(),
                    username: report.plan.username().map(str::to_owned),
                    issue_number,
                    steps,
                    failed_steps: report.failed_count(),
                    reason: None,
                    dry_run: false,
                }
            }
            RunOutcome::SelfRequestAborted => Self {
                plan: ActionPlan::AbortSelfRequest.name(),
                username: username.map(str::to_owned),
                ..Self::empty(issue_number)
            },
            RunOutcome::ProbeFailed(reason) => Self {
                plan: "probe-failure",
                username: username.map(str::to_owned),
                reason: Some(reason.clone()),
                ..Self::empty(issue_number)
            },
        }
    }

    /// Summarize a resolved plan that was not executed
    pub fn dry_run(plan: &ActionPlan, username: Option<&str>, issue_number: u64) -> Self {
        let reason = match plan {
            ActionPlan::AbortProbeFailure(r) => Some(r.clone()),
            _ => None,
        };
        Self {
            plan: plan.name(),
            username: plan.username().or(username).map(str::to_owned),
            reason,
            dry_run: true,
            ..Self::empty(issue_number)
        }
    }

    fn empty(issue_number: u64) -> Self {
        Self {
            plan: "",
            username: None,
            issue_number,
            steps: Vec::new(),
            failed_steps: 0,
            reason: None,
            dry_run: false,
        }
    }

    /// Render as a single JSON line
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Append step outputs to the `$GITHUB_OUTPUT` file at `path`
pub fn write_outputs(path: &Path, summary: &RunSummary) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;

    writeln!(f, "plan={}", summary.plan)?;
    writeln!(
        f,
        "username={}",
        safe_output_escape(summary.username.as_deref().unwrap_or(""))
    )?;
    writeln!(f, "issue_number={}", summary.issue_number)?;
    writeln!(f, "failed_steps={}", summary.failed_steps)?;
    writeln!(f, "dry_run={}", summary.dry_run)?;
    writeln!(f, "summary<<{DELIM}")?;
    writeln!(f, "{}", safe_output_escape(&summary.to_json()?))?;
    writeln!(f, "{DELIM}")?;
    Ok(())
}

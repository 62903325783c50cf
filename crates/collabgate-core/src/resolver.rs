//! Outcome resolver
//!
//! Pure decision function: the plan depends only on whether the mention is
//! the repository owner and on the probe result.

use crate::types::{ActionPlan, ProbeResult};

/// Owner self-mention check, run before probing.
///
/// Returns `Some(AbortSelfRequest)` when `username` is the owner. The
/// comparison is exact, matching [`resolve`].
#[inline]
pub fn precheck(username: &str, owner: &str) -> Option<ActionPlan> {
    (username == owner).then_some(ActionPlan::AbortSelfRequest)
}

/// Select the action plan.
///
/// Rules, in order:
/// 1. `username == owner` → [`ActionPlan::AbortSelfRequest`]
/// 2. `NotCollaborator` → [`ActionPlan::GrantAndClose`]
/// 3. `AlreadyCollaborator` → [`ActionPlan::NotifyDuplicateAndClose`]
/// 4. `LookupFailed(r)` → [`ActionPlan::AbortProbeFailure`]
pub fn resolve(username: &str, owner: &str, probe: ProbeResult) -> ActionPlan {
    if let Some(plan) = precheck(username, owner) {
        return plan;
    }

    match probe {
        ProbeResult::NotCollaborator => ActionPlan::GrantAndClose(username.to_string()),
        ProbeResult::AlreadyCollaborator => {
            ActionPlan::NotifyDuplicateAndClose(username.to_string())
        }
        ProbeResult::LookupFailed(reason) => ActionPlan::AbortProbeFailure(reason),
    }
}

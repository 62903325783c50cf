//! Authorization prober
//!
//! The single place where a membership-check answer becomes a
//! [`ProbeResult`]. A failed lookup stays distinct from "not a collaborator":
//! it must never be read as permission to grant.

use crate::traits::CollaboratorApi;
use crate::types::{CollaboratorCheck, ProbeResult, TargetRepository};

/// Query the current collaborator status of `username` on `repo`
pub async fn probe_collaborator<A: CollaboratorApi>(
    api: &A,
    repo: &TargetRepository,
    username: &str,
) -> ProbeResult {
    match api.check_collaborator(&repo.owner, &repo.name, username).await {
        Ok(check) => classify(check),
        Err(e) => {
            tracing::error!(
                repository = %repo,
                username,
                error = %e,
                "collaborator lookup failed"
            );
            ProbeResult::LookupFailed(e.to_string())
        }
    }
}

/// Map a successful membership-check answer
#[inline]
pub const fn classify(check: CollaboratorCheck) -> ProbeResult {
    match check {
        CollaboratorCheck::MemberConfirmed => ProbeResult::AlreadyCollaborator,
        CollaboratorCheck::NotFound => ProbeResult::NotCollaborator,
    }
}

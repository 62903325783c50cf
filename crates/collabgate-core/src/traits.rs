//! Trait definitions for the external collaborator service
//!
//! Static dispatch only: the pipeline is generic over the service, so tests
//! substitute an in-memory implementation without boxing.

use crate::error::Result;
use crate::types::{CollaboratorCheck, Permission};
use std::future::Future;

/// The four capability calls the pipeline needs, plus the read-only probe.
pub trait CollaboratorApi {
    /// Check whether `username` is a collaborator of `owner/repo`.
    ///
    /// `Ok(NotFound)` is the expected "not a collaborator" answer; any other
    /// non-confirming response must be returned as `Err`.
    fn check_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
    ) -> impl Future<Output = Result<CollaboratorCheck>> + Send + 'a;

    /// Grant `username` access to `owner/repo` at `permission`
    fn add_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
        permission: Permission,
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    /// Post a comment on an issue
    fn create_comment<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
        body: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    /// Add labels to an issue
    fn add_labels<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
        labels: &'a [&'a str],
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    /// Close an issue
    fn close_issue<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
    ) -> impl Future<Output = Result<()>> + Send + 'a;
}

//! GitHub Actions event payload parsing
//!
//! Only the `issue` object is read; every other payload field is ignored.

use crate::error::{Error, Result};
use crate::types::TriggerEvent;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    action: Option<String>,
    issue: Option<IssuePayload>,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    #[serde(default)]
    user: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

/// Trigger event plus the payload metadata worth logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    /// The record the pipeline consumes
    pub trigger: TriggerEvent,
    /// Webhook action (`opened`, `edited`, ...), when present
    pub action: Option<String>,
    /// Login of the issue author, when present
    pub author: Option<String>,
}

/// Parse an `issues` event payload
pub fn parse_event(json: &str) -> Result<ParsedEvent> {
    let payload: EventPayload = serde_json::from_str(json)
        .map_err(|e| Error::EventParse(format!("invalid event payload: {}", e)))?;

    let issue = payload
        .issue
        .ok_or_else(|| Error::EventParse("event payload has no issue object".to_string()))?;

    Ok(ParsedEvent {
        trigger: TriggerEvent::new(issue.title, issue.number),
        action: payload.action,
        author: issue.user.map(|u| u.login),
    })
}

/// Read and parse the payload file at `path`
pub fn load_event(path: &Path) -> Result<ParsedEvent> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        Error::EventParse(format!(
            "Failed to read event payload '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_event(&json)
}

/// Read the payload named by `GITHUB_EVENT_PATH`
pub fn load_event_from_env() -> Result<ParsedEvent> {
    let path = std::env::var("GITHUB_EVENT_PATH")
        .map_err(|_| Error::Config("GITHUB_EVENT_PATH not set".to_string()))?;
    load_event(Path::new(&path))
}

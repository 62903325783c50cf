//! Access configuration: target repository, labels and comment templates
//!
//! Values come from built-in defaults, optionally overlaid by a YAML file,
//! then by CLI flags. [`AccessConfig::validate`] runs last.
//!
//! YAML format (every key optional):
//! ```yaml
//! repository:
//!   owner: community
//!   name: maintainers
//! permission: read
//! granted_label: collaborator added
//! duplicate_label: duplicate request
//! granted_comment: "@{username} has been added ..."
//! duplicate_comment: "@{username} is already a member of this repository."
//! policy: best-effort
//! ```

use crate::error::{Error, Result};
use crate::types::{ExecutionPolicy, Permission, TargetRepository};
use serde::Deserialize;
use std::path::Path;

/// Placeholder substituted with the requested username
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// Default acknowledgement after a grant
pub const DEFAULT_GRANTED_COMMENT: &str = "@{username} has been added as a member of this repository. Please check your email or notifications for an invitation.";

/// Default reply to a duplicate request
pub const DEFAULT_DUPLICATE_COMMENT: &str = "@{username} is already a member of this repository.";

/// Default label after a grant
pub const DEFAULT_GRANTED_LABEL: &str = "collaborator added";

/// Default label for duplicate requests
pub const DEFAULT_DUPLICATE_LABEL: &str = "duplicate request";

/// Explicit configuration passed into the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    /// Repository whose collaborators are managed
    pub repository: TargetRepository,
    /// Permission granted to new collaborators
    pub permission: Permission,
    /// Label applied after a grant
    pub granted_label: String,
    /// Label applied to duplicate requests
    pub duplicate_label: String,
    /// Comment template posted after a grant
    pub granted_comment: String,
    /// Comment template posted for duplicate requests
    pub duplicate_comment: String,
    /// Reaction to failed steps
    pub policy: ExecutionPolicy,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            repository: TargetRepository::default(),
            permission: Permission::default(),
            granted_label: DEFAULT_GRANTED_LABEL.to_string(),
            duplicate_label: DEFAULT_DUPLICATE_LABEL.to_string(),
            granted_comment: DEFAULT_GRANTED_COMMENT.to_string(),
            duplicate_comment: DEFAULT_DUPLICATE_COMMENT.to_string(),
            policy: ExecutionPolicy::default(),
        }
    }
}

impl AccessConfig {
    /// Parse YAML; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML config file
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Check all invariants; call after every override is applied
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("repository.owner", &self.repository.owner),
            ("repository.name", &self.repository.name),
            ("granted_label", &self.granted_label),
            ("duplicate_label", &self.duplicate_label),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", field)));
            }
        }

        if self.repository.owner.contains('/') || self.repository.name.contains('/') {
            return Err(Error::Config(format!(
                "repository owner and name must not contain '/': {}",
                self.repository
            )));
        }

        for (field, template) in [
            ("granted_comment", &self.granted_comment),
            ("duplicate_comment", &self.duplicate_comment),
        ] {
            if !template.contains(USERNAME_PLACEHOLDER) {
                return Err(Error::Config(format!(
                    "{} template must contain '{}'",
                    field, USERNAME_PLACEHOLDER
                )));
            }
        }

        Ok(())
    }

    /// Acknowledgement comment for a granted user
    pub fn render_granted_comment(&self, username: &str) -> String {
        render(&self.granted_comment, username)
    }

    /// Comment for a user that is already a collaborator
    pub fn render_duplicate_comment(&self, username: &str) -> String {
        render(&self.duplicate_comment, username)
    }
}

fn render(template: &str, username: &str) -> String {
    template.replace(USERNAME_PLACEHOLDER, username)
}

/// Split an `owner/name` string such as `GITHUB_REPOSITORY`
pub fn parse_repository(s: &str) -> Result<TargetRepository> {
    let mut parts = s.trim().split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok(TargetRepository::new(owner, name))
        }
        _ => Err(Error::Config(format!(
            "Invalid repository format (expected owner/name): {}",
            s
        ))),
    }
}

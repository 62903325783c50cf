//! HTTP client for GitHub API

pub mod app_auth;
pub mod client;

pub use app_auth::{AppCredentials, InstallationToken};
pub use client::{GitHubApiClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

use crate::error::{Error, Result};

/// Where the API token comes from
#[derive(Debug, Clone)]
pub enum Credentials {
    /// GitHub App installation (preferred)
    App(AppCredentials),
    /// Pre-issued token, e.g. `GITHUB_TOKEN`
    Token(String),
}

impl Credentials {
    /// Pick app credentials when present, else a plain token
    pub fn resolve(app: Option<AppCredentials>, token: Option<String>) -> Result<Self> {
        match (app, token.filter(|t| !t.trim().is_empty())) {
            (Some(app), _) => Ok(Self::App(app)),
            (None, Some(token)) => Ok(Self::Token(token)),
            (None, None) => Err(Error::Config(
                "no credentials: set APP_ID/PRIVATE_KEY/INSTALLATION_ID or GITHUB_TOKEN"
                    .to_string(),
            )),
        }
    }

    /// Resolve from `APP_ID`/`PRIVATE_KEY`/`INSTALLATION_ID`, else `token`.
    ///
    /// A partial set of app variables is an error, never a silent fallback.
    pub fn from_env(token: Option<String>) -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), token)
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F, token: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(AppCredentials::from_lookup(lookup)?, token)
    }

    /// Produce a bearer token, exchanging app credentials if needed
    pub async fn access_token(self, api_base_url: &str) -> Result<String> {
        match self {
            Self::App(app) => Ok(app.exchange(api_base_url).await?.token),
            Self::Token(token) => Ok(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn app() -> AppCredentials {
        AppCredentials {
            app_id: "1".into(),
            private_key: "k".into(),
            installation_id: "2".into(),
        }
    }

    #[test]
    fn test_app_credentials_preferred() {
        let c = Credentials::resolve(Some(app()), Some("tok".into())).unwrap();
        assert_matches!(c, Credentials::App(_));
    }

    #[test]
    fn test_token_fallback() {
        let c = Credentials::resolve(None, Some("tok".into())).unwrap();
        assert_matches!(c, Credentials::Token(t) if t == "tok");
    }

    #[test]
    fn test_missing_credentials() {
        assert!(Credentials::resolve(None, Some("  ".into())).is_err());
        assert!(Credentials::resolve(None, None).is_err());
    }

    #[test]
    fn test_partial_app_variables_do_not_fall_back_to_token() {
        let err = Credentials::from_lookup(
            |name| (name == "APP_ID").then(|| "1".to_string()),
            Some("tok".into()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
        assert!(err.message().contains("must be set together"));
    }

    #[test]
    fn test_no_app_variables_uses_token() {
        let c = Credentials::from_lookup(|_| None, Some("tok".into())).unwrap();
        assert_matches!(c, Credentials::Token(t) if t == "tok");
    }

    #[tokio::test]
    async fn test_plain_token_passthrough() {
        let token = Credentials::Token("abc".into())
            .access_token(DEFAULT_API_URL)
            .await
            .unwrap();
        assert_eq!(token, "abc");
    }
}

//! GitHub App authentication
//!
//! Mints a short-lived installation access token by signing an RS256 JWT
//! with the app's private key and exchanging it at
//! `POST /app/installations/{id}/access_tokens`.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// GitHub rejects app JWTs that live longer than ten minutes
const JWT_LIFETIME_SECS: u64 = 600;
/// Backdate `iat` to tolerate clock drift
const JWT_CLOCK_SKEW_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct Claims {
    iat: u64,
    exp: u64,
    iss: String,
}

#[derive(Debug, Deserialize)]
struct InstallationTokenResponse {
    token: String,
    expires_at: Option<String>,
}

/// Installation token returned by the exchange
#[derive(Clone)]
pub struct InstallationToken {
    /// Bearer token for REST calls
    pub token: String,
    /// Expiry, when reported by the API
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// GitHub App credentials
#[derive(Clone)]
pub struct AppCredentials {
    /// Numeric app id (JWT issuer)
    pub app_id: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// Installation to mint the token for
    pub installation_id: String,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("private_key", &"<redacted>")
            .field("installation_id", &self.installation_id)
            .finish()
    }
}

impl AppCredentials {
    /// Read `APP_ID`, `PRIVATE_KEY` and `INSTALLATION_ID`.
    ///
    /// Returns `Ok(None)` when none are set, an error when only some are.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        match (read("APP_ID"), read("PRIVATE_KEY"), read("INSTALLATION_ID")) {
            (None, None, None) => Ok(None),
            (Some(app_id), Some(private_key), Some(installation_id)) => Ok(Some(Self {
                app_id,
                private_key: normalize_pem(&private_key),
                installation_id,
            })),
            _ => Err(Error::Config(
                "APP_ID, PRIVATE_KEY and INSTALLATION_ID must be set together".to_string(),
            )),
        }
    }

    /// Sign an app JWT valid from `now - 60s` to `now + 600s`
    pub fn generate_jwt(&self, now: u64) -> Result<String> {
        let claims = Claims {
            iat: now.saturating_sub(JWT_CLOCK_SKEW_SECS),
            exp: now + JWT_LIFETIME_SECS,
            iss: self.app_id.trim().to_string(),
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }

    /// Exchange the app JWT for an installation access token
    pub async fn exchange(&self, api_base_url: &str) -> Result<InstallationToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Runtime(e.to_string()))?
            .as_secs();
        self.exchange_at(api_base_url, now).await
    }

    /// Exchange a JWT issued at unix time `now`
    pub async fn exchange_at(&self, api_base_url: &str, now: u64) -> Result<InstallationToken> {
        let jwt = self.generate_jwt(now)?;

        let endpoint = format!(
            "{}/app/installations/{}/access_tokens",
            api_base_url.trim_end_matches('/'),
            self.installation_id.trim()
        );

        let client = reqwest::Client::builder()
            .user_agent(concat!("collabgate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Runtime(format!("failed to build HTTP client: {}", e)))?;

        let response = client
            .post(endpoint)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(jwt)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("token exchange request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(format!(
                "token exchange for installation {} returned {}",
                self.installation_id, status
            )));
        }

        let payload: InstallationTokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("malformed token exchange response: {}", e)))?;

        let expires_at = payload
            .expires_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        tracing::debug!(
            installation_id = %self.installation_id,
            expires_at = ?expires_at,
            "minted installation token"
        );

        Ok(InstallationToken {
            token: payload.token,
            expires_at,
        })
    }
}

/// Accept keys pasted with literal `\n` escapes (common in CI secrets)
fn normalize_pem(key: &str) -> String {
    if key.contains("\\n") && !key.contains('\n') {
        key.replace("\\n", "\n")
    } else {
        key.to_string()
    }
}

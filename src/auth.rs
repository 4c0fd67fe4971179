//! OAuth2 credential management for Google APIs.
//!
//! Two credential modes are supported, matching the two JSON files Google
//! hands out:
//!
//! - service account: a key file with an RSA private key, exchanged for an
//!   access token via a JWT assertion;
//! - authorized user: an installed-app client secret plus a persisted
//!   `token.json`; the stored access token is used while valid, refreshed
//!   with the `refresh_token` grant when expired, and the updated token file
//!   is written back in place.
//!
//! The interactive consent flow that mints the initial user token is out of
//! scope; obtain `token.json` with Google's tooling once, then this module
//! keeps it fresh.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, SheetsError};
use crate::models::{AuthorizedUser, ClientSecrets, ServiceAccountCredentials, TokenResponse};

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for both credential modes.
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

/// Refresh this long before the recorded expiry.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scopes, space-separated
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

#[derive(Debug)]
enum Mode {
    ServiceAccount {
        credentials: ServiceAccountCredentials,
        cached: RwLock<Option<CachedToken>>,
    },
    User {
        token_path: PathBuf,
        client_id: String,
        client_secret: String,
        token_uri: String,
        state: RwLock<AuthorizedUser>,
    },
}

/// Authenticator for Google APIs. Cheap to clone; clones share the token
/// cache and user-token state.
#[derive(Debug, Clone)]
pub struct Authenticator {
    mode: Arc<Mode>,
    client: Client,
}

impl Authenticator {
    /// Create an authenticator from credential file paths, picking the mode
    /// the way the credential pair implies: with a token path the
    /// credentials file is an installed-app client secret, without one it
    /// is a service account key.
    pub fn from_files<P: AsRef<Path>>(credentials_path: P, token_path: Option<P>) -> Result<Self> {
        match token_path {
            Some(token_path) => Self::authorized_user(Some(credentials_path), token_path),
            None => Self::service_account_from_file(credentials_path),
        }
    }

    /// Create a service-account authenticator from a JSON key file.
    pub fn service_account_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let credentials: ServiceAccountCredentials = serde_json::from_str(&content)?;
        Ok(Self::service_account(credentials))
    }

    /// Create a service-account authenticator from parsed credentials.
    pub fn service_account(credentials: ServiceAccountCredentials) -> Self {
        Self {
            mode: Arc::new(Mode::ServiceAccount {
                credentials,
                cached: RwLock::new(None),
            }),
            client: Client::new(),
        }
    }

    /// Create an authorized-user authenticator from a persisted `token.json`
    /// and, optionally, the installed-app client secret file.
    ///
    /// The client id/secret are taken from the token file when present
    /// there, falling back to the secrets file.
    pub fn authorized_user<P: AsRef<Path>>(
        secrets_path: Option<P>,
        token_path: P,
    ) -> Result<Self> {
        let token_path = token_path.as_ref().to_path_buf();
        let content = fs::read_to_string(&token_path)?;
        let state: AuthorizedUser = serde_json::from_str(&content)?;

        let secrets = match secrets_path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                let secrets: ClientSecrets = serde_json::from_str(&content)?;
                Some(secrets.installed)
            }
            None => None,
        };

        let client_id = state
            .client_id
            .clone()
            .or_else(|| secrets.as_ref().map(|s| s.client_id.clone()))
            .ok_or_else(|| {
                SheetsError::AuthenticationError(
                    "no client_id in token file or client secrets".to_string(),
                )
            })?;
        let client_secret = state
            .client_secret
            .clone()
            .or_else(|| secrets.as_ref().map(|s| s.client_secret.clone()))
            .ok_or_else(|| {
                SheetsError::AuthenticationError(
                    "no client_secret in token file or client secrets".to_string(),
                )
            })?;
        let token_uri = state
            .token_uri
            .clone()
            .or_else(|| secrets.as_ref().and_then(|s| s.token_uri.clone()))
            .unwrap_or_else(|| TOKEN_URI.to_string());

        Ok(Self {
            mode: Arc::new(Mode::User {
                token_path,
                client_id,
                client_secret,
                token_uri,
                state: RwLock::new(state),
            }),
            client: Client::new(),
        })
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        match &*self.mode {
            Mode::ServiceAccount { credentials, cached } => {
                // Check if we have a valid cached token
                {
                    let cached = cached.read().await;
                    if let Some(token) = cached.as_ref() {
                        let buffer = Duration::from_secs(EXPIRY_BUFFER_SECS as u64);
                        if token.expires_at > SystemTime::now() + buffer {
                            return Ok(token.access_token.clone());
                        }
                    }
                }

                let new_token = self.refresh_service_account(credentials).await?;

                {
                    let mut cached = cached.write().await;
                    *cached = Some(new_token.clone());
                }

                Ok(new_token.access_token)
            }
            Mode::User { state, .. } => {
                {
                    let state = state.read().await;
                    if let Some(token) = valid_user_token(&state) {
                        return Ok(token);
                    }
                }
                self.refresh_user_token().await
            }
        }
    }

    /// Refresh a service-account access token using a JWT assertion.
    async fn refresh_service_account(
        &self,
        credentials: &ServiceAccountCredentials,
    ) -> Result<CachedToken> {
        let token_uri = credentials.token_uri.as_deref().unwrap_or(TOKEN_URI);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SheetsError::AuthenticationError(e.to_string()))?
            .as_secs();

        let claims = Claims {
            iss: credentials.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: token_uri.to_string(),
            iat: now,
            exp: now + 3600, // 1 hour
        };

        // Create JWT
        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        let jwt = encode(&header, &claims, &key)?;

        // Exchange JWT for access token
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        let response = self.client.post(token_uri).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }

    /// Refresh the user access token with the `refresh_token` grant and
    /// persist the updated token file.
    async fn refresh_user_token(&self) -> Result<String> {
        let Mode::User {
            token_path,
            client_id,
            client_secret,
            token_uri,
            state,
        } = &*self.mode
        else {
            unreachable!("refresh_user_token called in service-account mode");
        };

        let mut state = state.write().await;

        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = valid_user_token(&state) {
            return Ok(token);
        }

        let refresh_token = state.refresh_token.clone().ok_or_else(|| {
            SheetsError::AuthenticationError(
                "token is expired and no refresh token is available; \
                 re-run the OAuth consent flow"
                    .to_string(),
            )
        })?;

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", &refresh_token),
        ];

        let response = self.client.post(token_uri).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        state.token = Some(token_response.access_token.clone());
        state.expiry =
            Some(Utc::now() + TimeDelta::seconds(token_response.expires_in as i64));

        // Save the credentials for the next run
        let serialized = serde_json::to_string_pretty(&*state)?;
        tokio::fs::write(token_path, serialized).await?;
        debug!(path = %token_path.display(), "persisted refreshed user token");

        Ok(token_response.access_token)
    }
}

/// Return the stored access token if it is still comfortably unexpired.
fn valid_user_token(state: &AuthorizedUser) -> Option<String> {
    let token = state.token.as_ref()?;
    let expiry = state.expiry?;
    if expiry - TimeDelta::seconds(EXPIRY_BUFFER_SECS) > Utc::now() {
        Some(token.clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialization() {
        let claims = Claims {
            iss: "test@example.iam.gserviceaccount.com".to_string(),
            scope: SCOPES.join(" "),
            aud: TOKEN_URI.to_string(),
            iat: 1234567890,
            exp: 1234571490,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("test@example.iam.gserviceaccount.com"));
        assert!(json.contains("auth/spreadsheets"));
        assert!(json.contains("auth/drive"));
    }

    #[test]
    fn test_valid_user_token_unexpired() {
        let state = AuthorizedUser {
            token: Some("ya29.token".to_string()),
            refresh_token: None,
            token_uri: None,
            client_id: None,
            client_secret: None,
            scopes: None,
            expiry: Some(Utc::now() + TimeDelta::hours(1)),
        };
        assert_eq!(valid_user_token(&state).as_deref(), Some("ya29.token"));
    }

    #[test]
    fn test_valid_user_token_expired() {
        let state = AuthorizedUser {
            token: Some("ya29.token".to_string()),
            refresh_token: None,
            token_uri: None,
            client_id: None,
            client_secret: None,
            scopes: None,
            expiry: Some(Utc::now() - TimeDelta::hours(1)),
        };
        assert!(valid_user_token(&state).is_none());
    }

    #[test]
    fn test_valid_user_token_within_buffer() {
        // Expires in 10 seconds, inside the 60 second buffer
        let state = AuthorizedUser {
            token: Some("ya29.token".to_string()),
            refresh_token: None,
            token_uri: None,
            client_id: None,
            client_secret: None,
            scopes: None,
            expiry: Some(Utc::now() + TimeDelta::seconds(10)),
        };
        assert!(valid_user_token(&state).is_none());
    }
}

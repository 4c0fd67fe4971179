//! Client cache keyed by credential identity.
//!
//! Building an [`Authenticator`] reads credential files and the first API
//! call performs an OAuth handshake. Callers that fan out over many sheets
//! should share one client per credential file; this cache does the keying
//! so they do not have to.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::Authenticator;
use crate::client::SheetsClient;
use crate::error::Result;

/// Canonical (credentials path, token path) pair identifying a credential.
type CacheKey = (PathBuf, Option<PathBuf>);

/// Read-mostly map from credential identity to a shared client.
#[derive(Default)]
pub struct ClientCache {
    clients: RwLock<HashMap<CacheKey, SheetsClient>>,
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the client for a credential pair, creating it on first use.
    ///
    /// The key is the canonicalized (credentials, token) path pair: two
    /// spellings of the same files share one client and one token cache,
    /// while distinct token files against one secrets file stay separate.
    pub async fn get_or_create<P: AsRef<Path>>(
        &self,
        credentials_path: P,
        token_path: Option<P>,
    ) -> Result<SheetsClient> {
        let key = (
            canonical_key(credentials_path.as_ref()),
            token_path.as_ref().map(|p| canonical_key(p.as_ref())),
        );

        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(&key) {
                return Ok(client.clone());
            }
        }

        let mut clients = self.clients.write().await;
        // A concurrent task may have created the client while we waited.
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        debug!(path = %key.0.display(), "creating client for credentials");
        let auth = Authenticator::from_files(credentials_path, token_path)?;
        let client = SheetsClient::new(auth);
        clients.insert(key, client.clone());
        Ok(client)
    }

    /// Number of cached clients.
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }

    /// Drop all cached clients. Subsequent lookups re-read the credential
    /// files.
    pub async fn clear(&self) {
        self.clients.write().await.clear();
    }
}

fn canonical_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn service_account_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        let creds = serde_json::json!({
            "client_email": "test@project.iam.gserviceaccount.com",
            "private_key": "key"
        });
        file.write_all(creds.to_string().as_bytes()).unwrap();
        file
    }

    fn client_secrets_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        let secrets = serde_json::json!({
            "installed": {
                "client_id": "id.apps.googleusercontent.com",
                "client_secret": "secret"
            }
        });
        file.write_all(secrets.to_string().as_bytes()).unwrap();
        file
    }

    fn user_token_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        let token = serde_json::json!({
            "token": "ya29.token",
            "refresh_token": "1//refresh"
        });
        file.write_all(token.to_string().as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_same_path_shares_client() {
        let file = service_account_file();
        let cache = ClientCache::new();

        cache.get_or_create(file.path(), None).await.unwrap();
        cache.get_or_create(file.path(), None).await.unwrap();

        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_paths_get_distinct_clients() {
        let first = service_account_file();
        let second = service_account_file();
        let cache = ClientCache::new();

        cache.get_or_create(first.path(), None).await.unwrap();
        cache.get_or_create(second.path(), None).await.unwrap();

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_same_token_path_shares_client() {
        let secrets = client_secrets_file();
        let token = user_token_file();
        let cache = ClientCache::new();

        cache
            .get_or_create(secrets.path(), Some(token.path()))
            .await
            .unwrap();
        cache
            .get_or_create(secrets.path(), Some(token.path()))
            .await
            .unwrap();

        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_token_files_get_distinct_clients() {
        // One installed-app secret shared by two users
        let secrets = client_secrets_file();
        let first_token = user_token_file();
        let second_token = user_token_file();
        let cache = ClientCache::new();

        cache
            .get_or_create(secrets.path(), Some(first_token.path()))
            .await
            .unwrap();
        cache
            .get_or_create(secrets.path(), Some(second_token.path()))
            .await
            .unwrap();

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_clear() {
        let file = service_account_file();
        let cache = ClientCache::new();

        cache.get_or_create(file.path(), None).await.unwrap();
        cache.clear().await;

        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_credentials_file() {
        let cache = ClientCache::new();
        let result = cache
            .get_or_create(Path::new("/nonexistent/credentials.json"), None)
            .await;

        assert!(result.is_err());
        assert!(cache.is_empty().await);
    }
}

use super::error::AuthError;
use super::models::Session;
use super::repository::SessionRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Domain rules over session storage: the source of truth for which refresh
/// tokens are still redeemable.
#[derive(Clone)]
pub struct SessionRegistry {
    repository: Arc<dyn SessionRepository>,
}

impl SessionRegistry {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Track a newly issued refresh token. Any storage failure is fatal to the
    /// issuance: an untracked refresh token must never reach the caller.
    pub async fn record(
        &self,
        user_id: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let session = Session::new(user_id.to_string(), refresh_token.to_string(), expires_at);

        let session = self.repository.create(session).await?;
        debug!(user_id = %session.user_id, session_id = %session.id, "Session recorded");

        Ok(session)
    }

    /// Find the session tracking this exact refresh token
    pub async fn find_by_token(&self, refresh_token: &str) -> Result<Session, AuthError> {
        match self.repository.find_by_token(refresh_token).await {
            Ok(session) => Ok(session),
            Err(shared::Error::NotFound) => Err(AuthError::SessionNotFound),
            Err(e) => Err(AuthError::PersistenceError(e.to_string())),
        }
    }

    /// Delete a session, reporting whether this call consumed it. Storage
    /// failures are logged and reported as `Failed`, never returned.
    pub async fn revoke(&self, session: &Session) -> Revocation {
        match self.repository.delete(&session.id).await {
            Ok(true) => {
                debug!(user_id = %session.user_id, session_id = %session.id, "Session revoked");
                Revocation::Revoked
            }
            Ok(false) => {
                debug!(session_id = %session.id, "Session was already gone when revoking");
                Revocation::AlreadyGone
            }
            Err(e) => {
                warn!(
                    session_id = %session.id,
                    error = %e,
                    "Failed to revoke session"
                );
                Revocation::Failed
            }
        }
    }
}

/// Outcome of [`SessionRegistry::revoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revocation {
    /// This call removed the session
    Revoked,
    /// Another caller removed it first
    AlreadyGone,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::sled_repository::SledSessionRepository;
    use async_trait::async_trait;
    use chrono::Duration;
    use tempfile::TempDir;

    fn registry(temp_dir: &TempDir) -> SessionRegistry {
        let repo = SledSessionRepository::new(temp_dir.path().join("sessions.sled")).unwrap();
        SessionRegistry::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_record_and_find() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);
        let expires_at = Utc::now() + Duration::days(30);

        let recorded = registry.record("user-1", "token-1", expires_at).await.unwrap();
        assert_eq!(recorded.user_id, "user-1");
        assert_eq!(recorded.refresh_token, "token-1");
        assert_eq!(recorded.expires_at, expires_at);

        let found = registry.find_by_token("token-1").await.unwrap();
        assert_eq!(found.id, recorded.id);
    }

    #[tokio::test]
    async fn test_find_missing_is_session_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);

        let result = registry.find_by_token("nope").await;
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_revoke_consumes_session() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);

        let session = registry
            .record("user-1", "token-1", Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(registry.revoke(&session).await, Revocation::Revoked);
        assert!(matches!(
            registry.find_by_token("token-1").await,
            Err(AuthError::SessionNotFound)
        ));

        // Only the first revoke consumes it
        assert_eq!(registry.revoke(&session).await, Revocation::AlreadyGone);
    }

    struct BrokenSessions;

    #[async_trait]
    impl SessionRepository for BrokenSessions {
        async fn create(&self, _session: Session) -> shared::Result<Session> {
            Err(shared::Error::Internal("disk full".to_string()))
        }

        async fn find_by_token(&self, _refresh_token: &str) -> shared::Result<Session> {
            Err(shared::Error::Internal("disk full".to_string()))
        }

        async fn delete(&self, _id: &str) -> shared::Result<bool> {
            Err(shared::Error::Internal("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_storage_failures() {
        let registry = SessionRegistry::new(Arc::new(BrokenSessions));

        let record = registry.record("user-1", "token-1", Utc::now()).await;
        assert!(matches!(record, Err(AuthError::PersistenceError(_))));

        let find = registry.find_by_token("token-1").await;
        assert!(matches!(find, Err(AuthError::PersistenceError(_))));

        // Swallowed
        let session = Session::new("user-1".to_string(), "token-1".to_string(), Utc::now());
        assert_eq!(registry.revoke(&session).await, Revocation::Failed);
    }
}

use super::models::{Session, User};
use async_trait::async_trait;
use shared::Result;

/// User storage. Email uniqueness is enforced by the store, not by callers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, failing with `AlreadyExists` if the email is taken
    async fn create(&self, user: User) -> Result<User>;

    /// Find a user by email, failing with `NotFound` if absent
    async fn find_by_email(&self, email: &str) -> Result<User>;

    /// Find a user by ID, failing with `NotFound` if absent
    async fn find_by_id(&self, id: &str) -> Result<User>;
}

/// Session storage. Refresh token uniqueness is enforced by the store.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a session, failing with `AlreadyExists` if the refresh token is taken
    async fn create(&self, session: Session) -> Result<Session>;

    /// Find a session by its exact refresh token string
    async fn find_by_token(&self, refresh_token: &str) -> Result<Session>;

    /// Delete a session by ID. Returns whether a session was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

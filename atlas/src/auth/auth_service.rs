use super::error::AuthError;
use super::models::{AuthResponse, LoginInput, RegisterInput, Session, TokenPair, User};
use super::password::{hash_password, verify_password};
use super::repository::{SessionRepository, UserRepository};
use super::session_registry::{Revocation, SessionRegistry};
use super::token::{TokenClass, TokenCodec};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Register, Login and Refresh. Holds no mutable state of its own; all
/// cross-call state lives in the injected stores.
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    sessions: SessionRegistry,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            user_repo,
            sessions: SessionRegistry::new(session_repo),
            tokens,
        }
    }

    /// Create an account and sign it in.
    ///
    /// If issuance fails after the user is stored, the call fails but the user
    /// remains; the caller can recover with Login.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthResponse, AuthError> {
        match self.user_repo.find_by_email(&input.email).await {
            Ok(_) => return Err(AuthError::UserAlreadyExists),
            Err(shared::Error::NotFound) => {}
            Err(e) => return Err(AuthError::PersistenceError(e.to_string())),
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.email, password_hash, input.full_name);

        let user = match self.user_repo.create(user).await {
            Ok(user) => user,
            // Lost a race with a concurrent Register for the same email
            Err(shared::Error::AlreadyExists(_)) => return Err(AuthError::UserAlreadyExists),
            Err(e) => return Err(AuthError::PersistenceError(e.to_string())),
        };
        info!(user_id = %user.id, "User registered");

        let (tokens, _) = self.issue_and_store(&user.id).await?;

        Ok(AuthResponse {
            user: user.summary(),
            tokens,
        })
    }

    /// Authenticate by email and password
    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AuthError> {
        let user = match self.user_repo.find_by_email(&input.email).await {
            Ok(user) => user,
            Err(shared::Error::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(AuthError::PersistenceError(e.to_string())),
        };

        if !verify_password(&user.password_hash, &input.password) {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let (tokens, _) = self.issue_and_store(&user.id).await?;
        info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            user: user.summary(),
            tokens,
        })
    }

    /// Redeem a refresh token for a new pair. The redeemed token is single-use.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenClass::Refresh)
            .map_err(|e| {
                debug!(error = %e, "Refresh token rejected");
                AuthError::InvalidRefreshToken
            })?;
        let user_id = claims.sub;

        let session = self.sessions.find_by_token(refresh_token).await?;

        if session.is_expired_at(Utc::now()) {
            return Err(AuthError::SessionExpired);
        }

        if session.user_id != user_id {
            warn!(
                session_id = %session.id,
                "Refresh token subject does not match session owner"
            );
            return Err(AuthError::InvalidSessionOwner);
        }

        let (tokens, issued) = self.issue_and_store(&user_id).await?;

        // Only the caller whose delete consumed the old session may keep its new pair
        match self.sessions.revoke(&session).await {
            Revocation::Revoked | Revocation::Failed => {}
            Revocation::AlreadyGone => {
                debug!(session_id = %session.id, "Refresh lost a race for the same token");
                self.sessions.revoke(&issued).await;
                return Err(AuthError::SessionNotFound);
            }
        }
        info!(user_id = %user_id, "Refresh token rotated");

        Ok(tokens)
    }

    /// Mint a pair and record its refresh token, returning the new session too
    async fn issue_and_store(&self, user_id: &str) -> Result<(TokenPair, Session), AuthError> {
        let access = self.tokens.issue(user_id, TokenClass::Access)?;
        let refresh = self.tokens.issue(user_id, TokenClass::Refresh)?;

        let session = self
            .sessions
            .record(user_id, &refresh.token, refresh.expires_at)
            .await?;

        let tokens = TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
        };
        Ok((tokens, session))
    }
}

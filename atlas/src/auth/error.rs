use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User already exists")]
    UserAlreadyExists,

    // Same message for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session owner")]
    InvalidSessionOwner,

    #[error("Password hashing error: {0}")]
    HashingFailure(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Token issuance error: {0}")]
    TokenIssue(String),
}

impl From<shared::Error> for AuthError {
    fn from(err: shared::Error) -> Self {
        AuthError::PersistenceError(err.to_string())
    }
}

/// Token codec failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::TokenIssue(err.to_string())
    }
}

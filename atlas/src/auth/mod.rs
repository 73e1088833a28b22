// Public API
pub mod auth_service;
pub mod duration;
pub mod error;
pub mod models;
pub mod password;
pub mod repository;
pub mod session_registry;
pub mod sled_repository;
pub mod token;

// Re-export commonly used types
pub use auth_service::AuthService;
pub use duration::parse_duration;
pub use error::{AuthError, TokenError};
pub use models::{AuthResponse, LoginInput, RegisterInput, Session, TokenPair, User, UserSummary};
pub use password::{MIN_PASSWORD_LEN, hash_password, validate_password_length, verify_password};
pub use repository::{SessionRepository, UserRepository};
pub use session_registry::{Revocation, SessionRegistry};
pub use sled_repository::{SledSessionRepository, SledUserRepository};
pub use token::{
    IssuedToken, TokenClaims, TokenClass, TokenCodec, TokenSettings, issue_token, verify_token,
};

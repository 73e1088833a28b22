use atlas::auth::{AuthService, SledSessionRepository, SledUserRepository, TokenCodec, TokenSettings};
use shared::config::Config;
use std::path::Path;
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }

    /// Open the credential stores under the configured data directory and
    /// wire the auth service.
    pub fn from_config(config: &Config) -> shared::Result<Self> {
        let base = Path::new(&config.data_dir);

        let user_repo = Arc::new(SledUserRepository::new(base.join("users.sled"))?);
        let session_repo = Arc::new(SledSessionRepository::new(base.join("sessions.sled"))?);
        let tokens = TokenCodec::new(TokenSettings::from_config(config));

        Ok(Self::new(Arc::new(AuthService::new(
            user_repo,
            session_repo,
            tokens,
        ))))
    }
}

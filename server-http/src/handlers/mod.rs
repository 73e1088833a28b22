pub mod auth;
pub mod health;

pub use auth::{login, refresh, register};
pub use health::health_check;

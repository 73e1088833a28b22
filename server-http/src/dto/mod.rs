pub mod auth;

pub use auth::{
    ErrorResponse, HealthResponse, LoginRequest, RefreshRequest, RegisterRequest,
};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::warn;

/// Immutable process configuration, built once at startup and passed down.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    /// Raw duration strings; the token codec owns parsing and fallback.
    pub jwt_access_expires: String,
    pub jwt_refresh_expires: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("http_port", &self.http_port)
            .field("data_dir", &self.data_dir)
            .field("jwt_access_secret", &"<redacted>")
            .field("jwt_refresh_secret", &"<redacted>")
            .field("jwt_access_expires", &self.jwt_access_expires)
            .field("jwt_refresh_expires", &self.jwt_refresh_expires)
            .finish()
    }
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_DATA_DIR: &str = "./data";
    const GENERATED_SECRET_LEN: usize = 64;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` is this over the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_port = lookup("ATLAS_HTTP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(Self::DEFAULT_HTTP_PORT);

        Self {
            host: lookup("ATLAS_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port,
            data_dir: lookup("ATLAS_DATA_DIR").unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            jwt_access_secret: secret_or_generated(&lookup, "JWT_ACCESS_SECRET"),
            jwt_refresh_secret: secret_or_generated(&lookup, "JWT_REFRESH_SECRET"),
            jwt_access_expires: lookup("JWT_ACCESS_EXPIRES").unwrap_or_default(),
            jwt_refresh_expires: lookup("JWT_REFRESH_EXPIRES").unwrap_or_default(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

fn secret_or_generated<F>(lookup: &F, key: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(secret) if !secret.trim().is_empty() => secret,
        _ => {
            warn!("{} not set, generating a random secret for this process", key);
            warn!("Tokens signed with a generated secret do not survive a restart");
            generate_secret(Config::GENERATED_SECRET_LEN)
        }
    }
}

fn generate_secret(len: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.data_dir, "./data");
        assert_eq!(config.jwt_access_secret.len(), 64);
        assert_eq!(config.jwt_refresh_secret.len(), 64);
        assert_ne!(config.jwt_access_secret, config.jwt_refresh_secret);
        assert!(config.jwt_access_expires.is_empty());
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("ATLAS_HOST", "127.0.0.1"),
            ("ATLAS_HTTP_PORT", "9000"),
            ("ATLAS_DATA_DIR", "/tmp/atlas"),
            ("JWT_ACCESS_SECRET", "access"),
            ("JWT_REFRESH_SECRET", "refresh"),
            ("JWT_ACCESS_EXPIRES", "10m"),
            ("JWT_REFRESH_EXPIRES", "48h"),
        ]));

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.data_dir, "/tmp/atlas");
        assert_eq!(config.jwt_access_secret, "access");
        assert_eq!(config.jwt_refresh_secret, "refresh");
        assert_eq!(config.jwt_access_expires, "10m");
        assert_eq!(config.jwt_refresh_expires, "48h");
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("ATLAS_HTTP_PORT", "not-a-port")]));
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup_from(&[("JWT_ACCESS_SECRET", "super-secret")]));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

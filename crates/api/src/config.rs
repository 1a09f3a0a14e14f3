use std::net::IpAddr;
use std::str::FromStr;

use atc_core::api_keys::hash_api_key;
use axum::http::HeaderValue;

use crate::auth::jwt::{JwtConfig, DEFAULT_ACCESS_EXPIRY_MINS};

/// Startup configuration errors. Reported once by `main` before binding.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which gate protects the command routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: Bearer <jwt>` signed with `JWT_SECRET`.
    Jwt,
    /// `X-API-KEY` header equal to the configured key.
    ApiKey,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jwt" => Ok(Self::Jwt),
            "api_key" | "api-key" | "apikey" => Ok(Self::ApiKey),
            other => Err(format!("unknown auth mode '{other}' (expected jwt or api_key)")),
        }
    }
}

/// Credentials for the selected [`AuthMode`].
#[derive(Debug, Clone)]
pub enum AuthConfig {
    Jwt(JwtConfig),
    /// Only the SHA-256 digest of the key is kept.
    ApiKey { key_hash: String },
}

impl AuthConfig {
    pub fn api_key(key: &str) -> Self {
        Self::ApiKey {
            key_hash: hash_api_key(key),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            Self::Jwt(_) => AuthMode::Jwt,
            Self::ApiKey { .. } => AuthMode::ApiKey,
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Connection pool size (default: `10`).
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Credentials for the auth gate.
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `8080`                  |
    /// | `DATABASE_URL` / `DSN`   | **required**            |
    /// | `DB_MAX_CONNECTIONS`     | `10`                    |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `AUTH_MODE`              | `jwt`                   |
    /// | `JWT_SECRET` / `API_SECRET` | required for `jwt`   |
    /// | `JWT_ACCESS_EXPIRY_MINS` | `15`                    |
    /// | `API_KEY` / `GITHUB_APP_API_KEY` | required for `api_key` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(
            "HOST",
            first_set(&lookup, &["HOST"]),
            IpAddr::from([0, 0, 0, 0]),
        )?;
        let port = parse_or("PORT", first_set(&lookup, &["PORT"]), 8080u16)?;
        let database_url = first_set(&lookup, &["DATABASE_URL", "DSN"])
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let db_max_connections = parse_or(
            "DB_MAX_CONNECTIONS",
            first_set(&lookup, &["DB_MAX_CONNECTIONS"]),
            10u32,
        )?;
        let request_timeout_secs = parse_or(
            "REQUEST_TIMEOUT_SECS",
            first_set(&lookup, &["REQUEST_TIMEOUT_SECS"]),
            30u64,
        )?;

        let cors_origins = first_set(&lookup, &["CORS_ORIGINS"])
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    reason: format!("'{origin}': {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mode = parse_or(
            "AUTH_MODE",
            first_set(&lookup, &["AUTH_MODE"]),
            AuthMode::Jwt,
        )?;
        let auth = match mode {
            AuthMode::Jwt => {
                let secret = first_set(&lookup, &["JWT_SECRET", "API_SECRET"])
                    .ok_or(ConfigError::Missing("JWT_SECRET"))?;
                let access_token_expiry_mins = parse_or(
                    "JWT_ACCESS_EXPIRY_MINS",
                    first_set(&lookup, &["JWT_ACCESS_EXPIRY_MINS"]),
                    DEFAULT_ACCESS_EXPIRY_MINS,
                )?;
                AuthConfig::Jwt(JwtConfig {
                    secret,
                    access_token_expiry_mins,
                })
            }
            AuthMode::ApiKey => {
                let key = first_set(&lookup, &["API_KEY", "GITHUB_APP_API_KEY"])
                    .ok_or(ConfigError::Missing("API_KEY"))?;
                AuthConfig::api_key(&key)
            }
        };

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            cors_origins,
            request_timeout_secs,
            auth,
        })
    }
}

/// First non-blank value among `names`, in order.
fn first_set<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|&name| lookup(name))
        .find(|value| !value.trim().is_empty())
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_minimal_env() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/atc"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.cors_origins,
            vec![HeaderValue::from_static("http://localhost:5173")]
        );
        assert_matches!(
            config.auth,
            AuthConfig::Jwt(ref jwt) if jwt.secret == "s3cret" && jwt.access_token_expiry_mins == 15
        );
    }

    #[test]
    fn legacy_variable_names_are_accepted() {
        let config = load(&[
            ("DSN", "postgres://legacy/atc"),
            ("AUTH_MODE", "api_key"),
            ("GITHUB_APP_API_KEY", "gh-key"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://legacy/atc");
        assert_eq!(config.auth.mode(), AuthMode::ApiKey);
        assert_matches!(
            config.auth,
            AuthConfig::ApiKey { ref key_hash } if *key_hash == hash_api_key("gh-key")
        );
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = load(&[("JWT_SECRET", "s3cret")]).unwrap_err();
        assert_matches!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn missing_secret_for_selected_mode_is_reported() {
        let err = load(&[("DATABASE_URL", "postgres://x")]).unwrap_err();
        assert_matches!(err, ConfigError::Missing("JWT_SECRET"));

        let err = load(&[("DATABASE_URL", "postgres://x"), ("AUTH_MODE", "api-key")]).unwrap_err();
        assert_matches!(err, ConfigError::Missing("API_KEY"));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let base = [("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "s")];

        let err = load(&[base[0], base[1], ("PORT", "eighty")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { name: "PORT", .. });

        let err = load(&[base[0], base[1], ("AUTH_MODE", "oauth")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { name: "AUTH_MODE", .. });

        let err = load(&[base[0], base[1], ("HOST", "not-an-ip")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { name: "HOST", .. });
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[1], "https://b.example");
    }
}

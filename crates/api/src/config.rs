use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Which document store backs the service.
    pub store: StoreBackend,
    /// Credential bootstrap and password-change rules.
    pub auth: AuthPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`JwtConfig::from_env`], [`StoreBackend::from_env`] and
    /// [`AuthPolicy::from_env`] for the remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            store: StoreBackend::from_env(),
            auth: AuthPolicy::from_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Store selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store; contents are lost on restart.
    Memory,
    Postgres { database_url: String },
}

impl StoreBackend {
    /// | Env Var         | Default                         |
    /// |-----------------|---------------------------------|
    /// | `STORE_BACKEND` | `memory` (`memory`, `postgres`) |
    /// | `DATABASE_URL`  | required for `postgres`         |
    pub fn from_env() -> Self {
        let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".into());
        match backend.trim().to_ascii_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORE_BACKEND=postgres"),
            },
            other => panic!("Unknown STORE_BACKEND '{other}', expected memory or postgres"),
        }
    }
}

// ---------------------------------------------------------------------------
// Auth policy
// ---------------------------------------------------------------------------

/// Rules applied by the [`AuthController`](crate::auth::controller::AuthController).
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    /// Username of the admin credential pair seeded on first start.
    pub admin_username: String,
    /// Password of the seeded admin credential pair.
    pub admin_default_password: String,
    /// Whether an unknown PS number presenting the default password gets an
    /// account created on the spot.
    pub user_auto_provision: bool,
    /// Password accepted for first-login provisioning.
    pub user_default_password: String,
    /// Whether employees must present their current password to change it.
    pub user_change_requires_current: bool,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            admin_username: "admin".into(),
            admin_default_password: "admin123".into(),
            user_auto_provision: true,
            user_default_password: "123456".into(),
            user_change_requires_current: true,
        }
    }
}

impl AuthPolicy {
    /// | Env Var                                  | Default    |
    /// |------------------------------------------|------------|
    /// | `ADMIN_USERNAME`                         | `admin`    |
    /// | `ADMIN_DEFAULT_PASSWORD`                 | `admin123` |
    /// | `USER_AUTO_PROVISION`                    | `true`     |
    /// | `USER_DEFAULT_PASSWORD`                  | `123456`   |
    /// | `USER_PASSWORD_CHANGE_REQUIRES_CURRENT`  | `true`     |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_default_password: std::env::var("ADMIN_DEFAULT_PASSWORD")
                .unwrap_or(defaults.admin_default_password),
            user_auto_provision: env_bool("USER_AUTO_PROVISION", defaults.user_auto_provision),
            user_default_password: std::env::var("USER_DEFAULT_PASSWORD")
                .unwrap_or(defaults.user_default_password),
            user_change_requires_current: env_bool(
                "USER_PASSWORD_CHANGE_REQUIRES_CURRENT",
                defaults.user_change_requires_current,
            ),
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => parse_bool(&raw).unwrap_or_else(|| panic!("{name} must be true or false")),
        Err(_) => default,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_flags_accept_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn default_policy_matches_portal_defaults() {
        let policy = AuthPolicy::default();
        assert_eq!(policy.admin_username, "admin");
        assert_eq!(policy.admin_default_password, "admin123");
        assert_eq!(policy.user_default_password, "123456");
        assert!(policy.user_auto_provision);
        assert!(policy.user_change_requires_current);
    }
}

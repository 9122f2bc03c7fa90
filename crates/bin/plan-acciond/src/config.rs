//! Configuration loading from a TOML file with environment variable overrides.
//!
//! Looks for `plan-accion.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Minimum length of the session signing secret, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Session cookie settings.
    pub session: SessionConfig,
    /// Administrator bootstrap.
    pub admin: AdminConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Session cookie configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie. When absent a random key is
    /// generated at startup and sessions do not survive a restart.
    pub secret: Option<String>,
    /// Mark the session cookie `Secure` (HTTPS only).
    pub secure_cookies: bool,
}

/// Administrator account created at startup when none exists.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: String,
}

/// Credentials of the administrator to bootstrap.
#[derive(Debug, Clone, Copy)]
pub struct AdminCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

impl Config {
    /// Load configuration from `plan-accion.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("plan-accion.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("PLAN_ACCION_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("PLAN_ACCION_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("PLAN_ACCION_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("PLAN_ACCION_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("PLAN_ACCION_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("PLAN_ACCION_SESSION_SECRET") {
            self.session.secret = Some(val);
        }
        if let Some(secure) = var("PLAN_ACCION_SECURE_COOKIES").and_then(|val| parse_flag(&val)) {
            self.session.secure_cookies = secure;
        }
        if let Some(val) = var("PLAN_ACCION_ADMIN_EMAIL") {
            self.admin.email = Some(val);
        }
        if let Some(val) = var("PLAN_ACCION_ADMIN_PASSWORD") {
            self.admin.password = Some(val);
        }
        if let Some(val) = var("PLAN_ACCION_ADMIN_NAME") {
            self.admin.name = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be non-zero".to_string(),
            ));
        }
        if let Some(secret) = &self.session.secret
            && secret.len() < MIN_SESSION_SECRET_LEN
        {
            return Err(ConfigError::Validation(format!(
                "session secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
            )));
        }
        if self.admin.email.is_some() != self.admin.password.is_some() {
            return Err(ConfigError::Validation(
                "admin email and password must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the administrator to bootstrap, if configured.
    #[must_use]
    pub fn admin_credentials(&self) -> Option<AdminCredentials<'_>> {
        match (&self.admin.email, &self.admin.password) {
            (Some(email), Some(password)) => Some(AdminCredentials {
                email,
                password,
                name: &self.admin.name,
            }),
            _ => None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:plan-accion.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "plan_acciond=info,plan_accion=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: None,
            password: None,
            name: "Administrador".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

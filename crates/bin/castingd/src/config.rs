//! Configuration loading from a TOML file with environment variable overrides.
//!
//! Looks for `casting.toml` in the working directory. Every field except the
//! token key has a default, so the file is optional. Environment variables
//! take precedence over file values.

use std::path::PathBuf;

use casting_adapter_auth_jwt::{JwtConfig, VerificationKey};
use serde::Deserialize;

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
    /// Bearer token verification.
    pub auth: AuthConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Signature algorithm accepted on bearer tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "HS256")]
    Hs256,
    #[serde(rename = "RS256")]
    Rs256,
}

impl std::str::FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::Hs256),
            "RS256" => Ok(Self::Rs256),
            other => Err(ConfigError::Validation(format!(
                "unsupported token algorithm {other:?}"
            ))),
        }
    }
}

/// Token verification settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub algorithm: Algorithm,
    /// Shared secret, required for `HS256`.
    pub secret: Option<String>,
    /// PEM public key file, required for `RS256`.
    pub public_key_path: Option<PathBuf>,
    /// Expected `iss` claim.
    pub issuer: Option<String>,
    /// Expected `aud` claim.
    pub audience: Option<String>,
    pub leeway_secs: u64,
}

impl Config {
    /// Load configuration from `casting.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, an override
    /// cannot be parsed, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("casting.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
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

    /// Apply overrides from `lookup`. For pairs of variables, the
    /// `CASTING_` one wins over the generic one.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("CASTING_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("CASTING_PORT") {
            self.server.port = parse_port(&val)?;
        }
        if let Some(val) = lookup("CASTING_BIND") {
            let (host, port) = val.rsplit_once(':').ok_or_else(|| {
                ConfigError::Validation(format!("CASTING_BIND must be host:port, got {val:?}"))
            })?;
            self.server.host = host.to_string();
            self.server.port = parse_port(port)?;
        }
        if let Some(val) = lookup("CASTING_DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
            self.database.url = val;
        }
        if let Some(val) = lookup("CASTING_LOG").or_else(|| lookup("RUST_LOG")) {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("CASTING_AUTH_ALGORITHM") {
            self.auth.algorithm = val.parse()?;
        }
        if let Some(val) = lookup("CASTING_AUTH_SECRET") {
            self.auth.secret = Some(val);
        }
        if let Some(val) = lookup("CASTING_AUTH_PUBLIC_KEY_PATH") {
            self.auth.public_key_path = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("CASTING_AUTH_ISSUER") {
            self.auth.issuer = Some(val);
        }
        if let Some(val) = lookup("CASTING_AUTH_AUDIENCE") {
            self.auth.audience = Some(val);
        }
        if let Some(val) = lookup("CASTING_AUTH_LEEWAY") {
            self.auth.leeway_secs = val.parse().map_err(|_| {
                ConfigError::Validation(format!("CASTING_AUTH_LEEWAY must be seconds, got {val:?}"))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        match self.auth.algorithm {
            Algorithm::Hs256 if self.auth.secret.as_deref().is_none_or(str::is_empty) => Err(
                ConfigError::Validation("HS256 requires auth.secret".to_string()),
            ),
            Algorithm::Rs256 if self.auth.public_key_path.is_none() => Err(
                ConfigError::Validation("RS256 requires auth.public_key_path".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Resolve the token verification settings, reading the PEM key from
    /// disk for `RS256`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key material is missing or unreadable.
    pub fn jwt_config(&self) -> Result<JwtConfig, ConfigError> {
        let key = match self.auth.algorithm {
            Algorithm::Hs256 => {
                let secret = self.auth.secret.as_ref().ok_or_else(|| {
                    ConfigError::Validation("HS256 requires auth.secret".to_string())
                })?;
                VerificationKey::SharedSecret(secret.as_bytes().to_vec())
            }
            Algorithm::Rs256 => {
                let path = self.auth.public_key_path.as_ref().ok_or_else(|| {
                    ConfigError::Validation("RS256 requires auth.public_key_path".to_string())
                })?;
                VerificationKey::RsaPublicPem(std::fs::read(path)?)
            }
        };

        Ok(JwtConfig {
            key,
            issuer: self.auth.issuer.clone(),
            audience: self.auth.audience.clone(),
            leeway_secs: self.auth.leeway_secs,
        })
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("invalid port {value:?}")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:casting.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "castingd=info,casting=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Hs256,
            secret: None,
            public_key_path: None,
            issuer: None,
            audience: None,
            leeway_secs: 60,
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn with_secret() -> Config {
        let mut config = Config::default();
        config.auth.secret = Some("s3cret".to_string());
        config
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite:casting.db?mode=rwc");
        assert_eq!(config.auth.algorithm, Algorithm::Hs256);
        assert_eq!(config.auth.leeway_secs, 60);
        assert!(config.auth.issuer.is_none());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [auth]
            algorithm = 'RS256'
            public_key_path = '/etc/casting/jwks.pem'
            issuer = 'https://casting.eu.auth0.com/'
            audience = 'casting'
            leeway_secs = 5
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.auth.algorithm, Algorithm::Rs256);
        assert_eq!(
            config.auth.public_key_path,
            Some(PathBuf::from("/etc/casting/jwks.pem"))
        );
        assert_eq!(config.auth.audience.as_deref(), Some("casting"));
        assert_eq!(config.auth.leeway_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 3000
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite:casting.db?mode=rwc");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("CASTING_PORT", "9000"),
                ("CASTING_AUTH_ALGORITHM", "rs256"),
                ("CASTING_AUTH_PUBLIC_KEY_PATH", "key.pem"),
                ("CASTING_AUTH_AUDIENCE", "casting"),
                ("CASTING_AUTH_LEEWAY", "0"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.algorithm, Algorithm::Rs256);
        assert_eq!(config.auth.public_key_path, Some(PathBuf::from("key.pem")));
        assert_eq!(config.auth.audience.as_deref(), Some("casting"));
        assert_eq!(config.auth.leeway_secs, 0);
    }

    #[test]
    fn should_let_bind_override_host_and_port() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("CASTING_HOST", "10.0.0.1"),
                ("CASTING_BIND", "127.0.0.1:7000"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:7000");
    }

    #[test]
    fn should_prefer_prefixed_variables_over_generic_ones() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("DATABASE_URL", "sqlite:generic.db"),
                ("CASTING_DATABASE_URL", "sqlite:casting-test.db"),
                ("RUST_LOG", "warn"),
                ("CASTING_LOG", "debug"),
            ]))
            .unwrap();
        assert_eq!(config.database_url(), "sqlite:casting-test.db");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_fall_back_to_generic_database_url() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("DATABASE_URL", "sqlite::memory:")]))
            .unwrap();
        assert_eq!(config.database_url(), "sqlite::memory:");
    }

    #[test]
    fn should_reject_unparsable_overrides() {
        assert!(
            Config::default()
                .apply_overrides(env(&[("CASTING_PORT", "eighty")]))
                .is_err()
        );
        assert!(
            Config::default()
                .apply_overrides(env(&[("CASTING_AUTH_ALGORITHM", "none")]))
                .is_err()
        );
        assert!(
            Config::default()
                .apply_overrides(env(&[("CASTING_BIND", "localhost")]))
                .is_err()
        );
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = with_secret();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_require_secret_for_hs256() {
        assert!(Config::default().validate().is_err());
        assert!(with_secret().validate().is_ok());
    }

    #[test]
    fn should_require_key_path_for_rs256() {
        let mut config = Config::default();
        config.auth.algorithm = Algorithm::Rs256;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_build_shared_secret_jwt_config() {
        let mut config = with_secret();
        config.auth.issuer = Some("https://casting.example/".to_string());

        let jwt = config.jwt_config().unwrap();

        assert!(matches!(jwt.key, VerificationKey::SharedSecret(ref s) if s == b"s3cret"));
        assert_eq!(jwt.issuer.as_deref(), Some("https://casting.example/"));
        assert_eq!(jwt.leeway_secs, 60);
    }

    #[test]
    fn should_fail_when_public_key_file_is_missing() {
        let mut config = Config::default();
        config.auth.algorithm = Algorithm::Rs256;
        config.auth.public_key_path = Some(PathBuf::from("/nonexistent/casting.pem"));

        assert!(matches!(config.jwt_config(), Err(ConfigError::Io(_))));
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}

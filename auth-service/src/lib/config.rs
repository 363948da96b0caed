use std::env;
use std::time::Duration;

use auth::HashingCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Upper bound for a single signup/login/refresh operation
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_token_ttl_minutes")]
    pub refresh_token_ttl_minutes: i64,
}

/// Argon2 cost settings. Memory is in KiB.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashingCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl PasswordConfig {
    pub fn hashing_cost(&self) -> HashingCost {
        HashingCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl JwtConfig {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.refresh_token_ttl_minutes)
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_request_timeout_secs() -> u64 {
    100
}

fn default_access_token_ttl_minutes() -> i64 {
    24 * 60
}

fn default_refresh_token_ttl_minutes() -> i64 {
    7 * 24 * 60
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment())
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

/// Unprefixed variables, `__` separating nesting levels.
///
/// Example: `DATABASE__URL=postgres://...` overrides `database.url`.
fn environment() -> Environment {
    Environment::default().separator("__")
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(source: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/auth"

            [server]
            http_port = 3000

            [jwt]
            secret = "secret"
            "#,
        )
        .expect("Config should parse");

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.request_timeout(), Duration::from_secs(100));
        assert_eq!(config.jwt.access_token_ttl(), chrono::Duration::hours(24));
        assert_eq!(config.jwt.refresh_token_ttl(), chrono::Duration::days(7));
        assert_eq!(config.password.hashing_cost(), HashingCost::default());
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/auth"
            max_connections = 20

            [server]
            http_port = 8080
            request_timeout_secs = 5

            [jwt]
            secret = "secret"
            access_token_ttl_minutes = 15
            refresh_token_ttl_minutes = 60

            [password]
            memory_kib = 65536
            iterations = 3
            parallelism = 2
            "#,
        )
        .expect("Config should parse");

        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.server.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.jwt.access_token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(
            config.password.hashing_cost(),
            HashingCost {
                memory_kib: 65536,
                iterations: 3,
                parallelism: 2,
            }
        );
    }

    const FILE_SOURCE: &str = r#"
        [database]
        url = "postgres://localhost/auth"

        [server]
        http_port = 3000

        [jwt]
        secret = "from-file"
        "#;

    #[test]
    fn test_environment_overrides_file() {
        env::set_var("JWT__SECRET", "from-env-secret");

        let config: Config = ConfigBuilder::builder()
            .add_source(File::from_str(FILE_SOURCE, FileFormat::Toml))
            .add_source(environment())
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("Config should parse");

        env::remove_var("JWT__SECRET");

        assert_eq!(config.jwt.secret, "from-env-secret");
    }

    #[test]
    fn test_environment_overrides_nested_values() {
        let vars = [
            ("DATABASE__URL", "postgres://db.internal/auth"),
            ("SERVER__REQUEST_TIMEOUT_SECS", "7"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config: Config = ConfigBuilder::builder()
            .add_source(File::from_str(FILE_SOURCE, FileFormat::Toml))
            .add_source(environment().source(Some(vars)))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("Config should parse");

        assert_eq!(config.database.url, "postgres://db.internal/auth");
        assert_eq!(config.server.request_timeout(), Duration::from_secs(7));
        assert_eq!(config.jwt.secret, "from-file");
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = from_toml(
            r#"
            [database]
            url = "postgres://localhost/auth"

            [server]
            http_port = 3000

            [jwt]
            "#,
        );

        assert!(result.is_err());
    }
}

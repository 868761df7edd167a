use std::env;

use auth::JwtError;
use auth::TokenConfig;
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
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    /// Base64-encoded signing key
    pub secret: String,
    #[serde(default = "default_expiration_ms")]
    pub expiration_ms: i64,
    #[serde(default = "default_refresh_expiration_ms")]
    pub refresh_expiration_ms: i64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_ms() -> i64 {
    86_400_000
}

fn default_refresh_expiration_ms() -> i64 {
    604_800_000
}

impl JwtConfig {
    /// Decode the signing key and pair it with the configured lifetimes.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is not valid base64
    pub fn token_config(&self) -> Result<TokenConfig, JwtError> {
        TokenConfig::from_base64_secret(
            &self.secret,
            self.expiration_ms,
            self.refresh_expiration_ms,
        )
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_ms", &self.expiration_ms)
            .field("refresh_expiration_ms", &self.refresh_expiration_ms)
            .finish()
    }
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
            // Example: JWT__EXPIRATION_MS=3600000 overrides jwt.expiration_ms
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

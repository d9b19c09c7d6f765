/**
 * Server Configuration
 *
 * This module resolves the server configuration and opens the SQLite pool.
 *
 * # Configuration Sources
 *
 * Each setting is resolved with the following priority (highest first):
 * 1. Environment variables (a `.env` file is loaded by the binary first)
 * 2. TOML config file (`TASKBOARD_CONFIG`, or `<config dir>/taskboard/config.toml`)
 * 3. Compiled defaults
 *
 * # Error Handling
 *
 * An explicitly named config file that cannot be read or parsed is an error.
 * A missing default config file is treated as empty. Database failures are
 * logged and leave the pool unset, so the server still starts and database
 * routes answer 503.
 */

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Development fallback for `JWT_SECRET`
const DEV_JWT_SECRET: &str = "taskboard-dev-secret-change-me";

/// Errors that can occur when loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// An environment variable held a value of the wrong type.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// TOML file layout (all fields optional for partial overrides)
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerSection,
    database: DatabaseSection,
    auth: AuthSection,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerSection {
    bind_addr: Option<String>,
    log_level: Option<String>,
    event_channel_capacity: Option<usize>,
    activity_page_size: Option<i64>,
}

/// `[database]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DatabaseSection {
    url: Option<String>,
}

/// `[auth]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AuthSection {
    jwt_secret: Option<String>,
    token_ttl_days: Option<i64>,
    bcrypt_cost: Option<u32>,
}

/// Values taken from environment variables
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub bind_addr: Option<String>,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub token_ttl_days: Option<i64>,
    pub bcrypt_cost: Option<u32>,
    pub event_channel_capacity: Option<usize>,
    pub activity_page_size: Option<i64>,
    pub log_level: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env_string("SERVER_ADDR"),
            database_url: env_string("DATABASE_URL"),
            jwt_secret: env_string("JWT_SECRET"),
            token_ttl_days: env_parsed("TOKEN_TTL_DAYS")?,
            bcrypt_cost: env_parsed("BCRYPT_COST")?,
            event_channel_capacity: env_parsed("EVENT_CHANNEL_CAPACITY")?,
            activity_page_size: env_parsed("ACTIVITY_PAGE_SIZE")?,
            log_level: env_string("LOG_LEVEL"),
            config_path: env_string("TASKBOARD_CONFIG").map(PathBuf::from),
        })
    }
}

/// Fully resolved server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    pub bind_addr: String,
    /// SQLite connection URL
    pub database_url: String,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in days
    pub token_ttl_days: i64,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Buffer size of each per-board broadcast channel
    pub event_channel_capacity: usize,
    /// Maximum number of activity entries returned per board
    pub activity_page_size: i64,
    /// Log level filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("event_channel_capacity", &self.event_channel_capacity)
            .field("activity_page_size", &self.activity_page_size)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            database_url: "sqlite://taskboard.db?mode=rwc".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            event_channel_capacity: 256,
            activity_page_size: 50,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment and the config file
    pub fn load() -> Result<Self, ConfigError> {
        let env = EnvOverrides::from_env()?;
        let file = load_config_file(env.config_path.as_deref())?;
        Ok(Self::resolve(&env, &file))
    }

    /// Merge env overrides, file values and defaults.
    ///
    /// Priority: env > file > default.
    fn resolve(env: &EnvOverrides, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        let jwt_secret = env
            .jwt_secret
            .clone()
            .or_else(|| file.auth.jwt_secret.clone())
            .unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret.clone()
            });

        Self {
            bind_addr: env
                .bind_addr
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            database_url: env
                .database_url
                .clone()
                .or_else(|| file.database.url.clone())
                .unwrap_or(defaults.database_url),
            jwt_secret,
            token_ttl_days: env
                .token_ttl_days
                .or(file.auth.token_ttl_days)
                .unwrap_or(defaults.token_ttl_days),
            bcrypt_cost: env
                .bcrypt_cost
                .or(file.auth.bcrypt_cost)
                .unwrap_or(defaults.bcrypt_cost)
                .clamp(4, 31),
            event_channel_capacity: env
                .event_channel_capacity
                .or(file.server.event_channel_capacity)
                .unwrap_or(defaults.event_channel_capacity)
                .max(1),
            activity_page_size: env
                .activity_page_size
                .or(file.server.activity_page_size)
                .unwrap_or(defaults.activity_page_size),
            log_level: env
                .log_level
                .clone()
                .or_else(|| file.server.log_level.clone())
                .unwrap_or(defaults.log_level),
        }
    }
}

fn env_string(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn env_parsed<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env_string(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        None => Ok(None),
    }
}

/// Load and parse the TOML config file.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("taskboard").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

/// Open a SQLite pool and apply migrations
///
/// File databases run in WAL mode so readers never block the single writer.
/// In-memory databases are private to one connection, so their pool is
/// pinned to exactly one connection that is never recycled.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        SqlitePoolOptions::new().max_connections(8)
    };

    let pool = pool_options.connect_with(options).await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}

/// Begin a transaction that holds the write lock from its first statement
///
/// A deferred transaction that upgrades its lock part way through gets
/// `SQLITE_BUSY` at once when another writer holds it; `BEGIN IMMEDIATE`
/// waits out the busy timeout instead.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Database configuration result
///
/// `None` if the database could not be opened; the server then runs with
/// database routes answering 503.
pub type DatabaseConfig = Option<SqlitePool>;

/// Load and initialize the database connection pool
pub async fn load_database(config: &ServerConfig) -> DatabaseConfig {
    tracing::info!(url = %config.database_url, "Connecting to database...");

    match connect_database(&config.database_url).await {
        Ok(pool) => {
            tracing::info!("Database ready, migrations applied");
            Some(pool)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to open database");
            tracing::warn!("Database features will be disabled.");
            None
        }
    }
}

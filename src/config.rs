use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    pub port: u16,
    pub db_max_connections: u32,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

/// Where the PostgreSQL server lives: either a full connection URL or the
/// `POSTGRES_*` / `DATABASE_HOST` variables used by the docker-compose deployment.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
    Url(String),
    Parts {
        host: String,
        port: u16,
        username: String,
        password: String,
        database: String,
    },
}

impl DatabaseSettings {
    /// Connection options for the pool. Split credentials are passed as
    /// discrete fields, so they never go through URL parsing.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match self {
            DatabaseSettings::Url(url) => PgConnectOptions::from_str(url)
                .map_err(|e| anyhow::anyhow!("Invalid database URL: {}", e)),
            DatabaseSettings::Parts {
                host,
                port,
                username,
                password,
                database,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(username)
                .password(password)
                .database(database)
                .ssl_mode(PgSslMode::Disable)),
        }
    }
}

// Credentials stay out of logs and panics.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseSettings::Url(_) => f.write_str("Url(<redacted>)"),
            DatabaseSettings::Parts {
                host,
                port,
                username,
                database,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("username", username)
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        let options = config.database.connect_options()?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database: {}:{}/{}",
            options.get_host(),
            options.get_port(),
            options.get_database().unwrap_or("-")
        );
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Rate limit: {}/s, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DB_URL").or_else(|| lookup("DATABASE_URL")) {
            Some(url) => {
                if url.trim().is_empty() {
                    anyhow::bail!("DB_URL cannot be empty");
                }
                if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                    anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                }
                DatabaseSettings::Url(url)
            }
            None => database_from_parts(&lookup)?,
        };

        Ok(Self {
            database,
            port: parse_or(&lookup, "PORT", 8080)
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            db_max_connections: positive_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            rate_limit_per_second: positive_or(&lookup, "RATE_LIMIT_PER_SECOND", 10)?,
            rate_limit_burst: positive_or(&lookup, "RATE_LIMIT_BURST", 20)?,
        })
    }
}

fn database_from_parts<F>(lookup: &F) -> anyhow::Result<DatabaseSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| -> anyhow::Result<String> {
        lookup(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "DB_URL or DATABASE_URL environment variable required (or {} for the split form)",
                    key
                )
            })
    };

    Ok(DatabaseSettings::Parts {
        username: required("POSTGRES_USER")?,
        password: required("POSTGRES_PASSWORD")?,
        database: required("POSTGRES_DB")?,
        host: required("DATABASE_HOST")?,
        port: parse_or(lookup, "DATABASE_PORT", 5432)
            .map_err(|_| anyhow::anyhow!("DATABASE_PORT must be a valid port number"))?,
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, T::Err>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse(),
        None => Ok(default),
    }
}

fn positive_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    let value = parse_or(lookup, key, default)
        .map_err(|_| anyhow::anyhow!("{} must be a positive number", key))?;
    if value <= T::default() {
        anyhow::bail!("{} must be greater than zero", key);
    }
    Ok(value)
}

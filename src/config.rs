use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use dotenvy::dotenv;
use strum_macros::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    MySql,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,

    pub store_backend: StoreBackend,
    /// Only read for the mysql backend.
    pub database_url: Option<String>,
    /// Start the memory backend with the two demo employees.
    pub memory_sample_data: bool,

    pub jwt_secret: String,
    pub session_ttl: usize,

    // Rate limiting
    pub rate_session_per_min: u32,
    pub rate_api_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has an invalid value `{raw}`: {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),

            store_backend: var_or("STORE_BACKEND", StoreBackend::Memory)?,
            database_url: env::var("DATABASE_URL").ok(),
            memory_sample_data: var_or("MEMORY_SAMPLE_DATA", true)?,

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            session_ttl: var_or("SESSION_TTL", 86_400)?, // default 1 day

            rate_session_per_min: var_or("RATE_SESSION_PER_MIN", 30)?,
            rate_api_per_min: var_or("RATE_API_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: var_or("LOG_LEVEL", tracing::Level::DEBUG)?,
        })
    }

    /// `DATABASE_URL`, required once the mysql backend is selected.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set when STORE_BACKEND=mysql")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("mysql".parse::<StoreBackend>().unwrap(), StoreBackend::MySql);
        assert!("firestore".parse::<StoreBackend>().is_err());
        assert_eq!(StoreBackend::MySql.to_string(), "mysql");
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        let ttl: usize = var_or("HRMS_LITE_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(ttl, 42);
    }
}

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Argon2id cost parameters and the registration password policy.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
    pub min_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub retry_delay_secs: u64,
}

impl DbConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DbConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub catalog_path: String,
    pub host: String,
    pub port: u16,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DB_URL"))
            .context("DATABASE_URL is not set")?;
        let database = DbConfig {
            url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            connect_attempts: env_or("DB_CONNECT_ATTEMPTS", 5),
            retry_delay_secs: env_or("DB_CONNECT_RETRY_SECS", 5),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "matchday".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "matchday-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60 * 24),
        };
        let password = PasswordConfig {
            m_cost: env_or("ARGON2_M_COST", argon2::Params::DEFAULT_M_COST),
            t_cost: env_or("ARGON2_T_COST", argon2::Params::DEFAULT_T_COST),
            p_cost: env_or("ARGON2_P_COST", argon2::Params::DEFAULT_P_COST),
            min_length: env_or("PASSWORD_MIN_LENGTH", 8),
        };
        let port = std::env::var("APP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        Ok(Self {
            database,
            jwt,
            password,
            catalog_path: std::env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "data/matches.json".into()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
        })
    }
}

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

/// Accepted range for `JWT_TTL_DAYS`.
pub const TTL_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;

impl JwtConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.secret.is_empty(), "JWT_SECRET must not be empty");
        anyhow::ensure!(
            TTL_DAYS_RANGE.contains(&self.ttl_days),
            "JWT_TTL_DAYS must be between {} and {}, got {}",
            TTL_DAYS_RANGE.start(),
            TTL_DAYS_RANGE.end(),
            self.ttl_days
        );
        Ok(())
    }
}

/// Argon2 cost parameters. Defaults match `argon2::Params::default()`.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "gatekeeper".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "gatekeeper-users".into()),
            ttl_days: env_parse("JWT_TTL_DAYS").unwrap_or(30),
        };
        jwt.validate()?;

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: env_parse("ARGON2_MEMORY_KIB").unwrap_or(defaults.memory_kib),
            iterations: env_parse("ARGON2_ITERATIONS").unwrap_or(defaults.iterations),
            parallelism: env_parse("ARGON2_PARALLELISM").unwrap_or(defaults.parallelism),
        };

        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT").unwrap_or(8080),
            jwt,
            password,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

use anyhow::{anyhow, Context};
use chrono::FixedOffset;
use std::env;

use crate::i18n::Locale;

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means records are kept in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_access_ttl_secs: i64,

    pub default_locale: Locale,
    pub default_utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let offset_minutes: i32 = parse_or("DEFAULT_UTC_OFFSET_MINUTES", 0)?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 20)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_access_ttl_secs: parse_or("JWT_ACCESS_TTL_SECS", 900)?,

            default_locale: match env::var("DEFAULT_LOCALE") {
                Ok(tag) => tag.parse().map_err(|e: String| anyhow!(e))?,
                Err(_) => Locale::En,
            },
            default_utc_offset: offset_from_minutes(offset_minutes)
                .context("DEFAULT_UTC_OFFSET_MINUTES is out of range")?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `None` outside ±14 hours.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if !(-840..=840).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_bounds() {
        assert_eq!(offset_from_minutes(-180).unwrap().local_minus_utc(), -10800);
        assert!(offset_from_minutes(840).is_some());
        assert!(offset_from_minutes(841).is_none());
        assert!(offset_from_minutes(-841).is_none());
    }
}

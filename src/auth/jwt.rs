use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Tokens are minted by the identity service in production; this exists so
/// local tooling and tests can produce one with the shared secret.
pub fn create_access_token(user_id: Uuid, email: &str, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (now + Duration::seconds(config.jwt_access_ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create access token: {}", e)))
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use chrono::FixedOffset;

    fn config(secret: &str) -> Config {
        Config {
            database_url: None,
            db_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: secret.into(),
            jwt_access_ttl_secs: 60,
            default_locale: Locale::En,
            default_utc_offset: FixedOffset::east_opt(0).unwrap(),
        }
    }

    #[test]
    fn test_token_round_trip_keeps_subject() {
        let config = config("secret");
        let id = Uuid::new_v4();
        let token = create_access_token(id, "a@b.c", &config).unwrap();
        let data = verify_token(&token, &config).unwrap();
        assert_eq!(data.claims.sub, id);
        assert_eq!(data.claims.email, "a@b.c");
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = create_access_token(Uuid::new_v4(), "", &config("one")).unwrap();
        assert!(matches!(
            verify_token(&token, &config("two")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = config("secret");
        config.jwt_access_ttl_secs = -3600;
        let token = create_access_token(Uuid::new_v4(), "", &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }
}

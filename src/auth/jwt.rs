use anyhow::Context;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{auth::claims::Claims, config::JwtConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

/// Signs and verifies session tokens with the process-wide secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        let ttl = cfg
            .ttl_days
            .checked_mul(24 * 60 * 60)
            .map(Duration::seconds)
            .context("token ttl out of range")?;
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl,
        })
    }

    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_at(user_id, OffsetDateTime::now_utc())
    }

    pub(crate) fn sign_at(&self, user_id: Uuid, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now
            .checked_add(self.ttl)
            .context("token expiry out of range")?;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_days: 30,
        })
        .expect("valid jwt config")
    }

    #[test]
    fn sign_and_verify_token() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn token_is_valid_for_thirty_days() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.sign(Uuid::new_v4()).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_other_secret() {
        let good = make_keys("secret-a", "iss", "aud");
        let bad = make_keys("secret-b", "iss", "aud");
        let token = good.sign(Uuid::new_v4()).unwrap();
        assert_eq!(bad.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good.sign(Uuid::new_v4()).unwrap();
        assert_eq!(bad.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn verify_reports_expired_token() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let issued = OffsetDateTime::now_utc() - Duration::days(31);
        let token = keys.sign_at(Uuid::new_v4(), issued).unwrap();
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn new_rejects_unusable_ttl() {
        for ttl_days in [0, -1, 5_000_000, i64::MAX] {
            let res = JwtKeys::new(&JwtConfig {
                secret: "dev-secret".into(),
                issuer: "iss".into(),
                audience: "aud".into(),
                ttl_days,
            });
            assert!(res.is_err(), "ttl_days {ttl_days} accepted");
        }
    }

    #[test]
    fn longest_ttl_signs_a_usable_token() {
        let keys = JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_days: 3650,
        })
        .unwrap();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).unwrap();
        assert_eq!(keys.verify(&token).unwrap().sub, user_id);
    }

    #[test]
    fn sign_at_far_future_errors_instead_of_panicking() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let err = keys
            .sign_at(Uuid::new_v4(), time::PrimitiveDateTime::MAX.assume_utc())
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert_eq!(keys.verify("not.a.jwt").unwrap_err(), TokenError::Invalid);
        assert_eq!(keys.verify("").unwrap_err(), TokenError::Invalid);
    }
}

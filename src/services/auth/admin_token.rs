use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by admin token signing/verification.
#[derive(Debug, Error)]
pub enum AdminTokenError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token does not carry the admin claim")]
    NotAdmin,
}

/// Claims of the admin bearer token.
///
/// `timestamp` is the issue time in milliseconds, kept for clients that read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub admin: bool,
    pub timestamp: i64,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signer/verifier for admin bearer tokens.
///
/// The HMAC secret is the admin password. Key material is not printable via Debug.
#[derive(Clone)]
pub struct AdminTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for AdminTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminTokens")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl AdminTokens {
    pub fn new(secret: &str, ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(&self) -> Result<String, AdminTokenError> {
        self.issue_at(Utc::now())
    }

    /// Signs a token as if issued at `issued_at`; expiry is `issued_at + ttl`.
    pub fn issue_at(&self, issued_at: DateTime<Utc>) -> Result<String, AdminTokenError> {
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let iat = issued_at.timestamp();
        let claims = AdminClaims {
            admin: true,
            timestamp: issued_at.timestamp_millis(),
            iat,
            exp: iat.saturating_add(ttl),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        Ok(jsonwebtoken::encode(&header, &claims, &self.encoding_key)?)
    }

    /// Signature + `exp` check, then the `admin` claim must be true.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AdminTokenError> {
        let data = jsonwebtoken::decode::<AdminClaims>(token, &self.decoding_key, &self.validation)?;

        if !data.claims.admin {
            return Err(AdminTokenError::NotAdmin);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    const DAY: u64 = 24 * 60 * 60;

    #[test]
    fn fresh_token_verifies() {
        let tokens = AdminTokens::new("s3cret", DAY, 0);
        let token = tokens.issue().unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert!(claims.admin);
        assert_eq!(claims.exp - claims.iat, DAY as i64);
    }

    #[test]
    fn token_older_than_ttl_is_rejected() {
        let tokens = AdminTokens::new("s3cret", DAY, 0);
        let token = tokens
            .issue_at(Utc::now() - Duration::hours(25))
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(AdminTokenError::Jwt(_))));
    }

    #[test]
    fn token_signed_with_another_password_is_rejected() {
        let issued = AdminTokens::new("old-password", DAY, 0).issue().unwrap();
        let tokens = AdminTokens::new("new-password", DAY, 0);
        assert!(tokens.verify(&issued).is_err());
    }

    #[test]
    fn non_admin_claims_are_rejected() {
        let now = Utc::now();
        let claims = AdminClaims {
            admin: false,
            timestamp: now.timestamp_millis(),
            iat: now.timestamp(),
            exp: now.timestamp() + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"s3cret"),
        )
        .unwrap();

        let tokens = AdminTokens::new("s3cret", DAY, 0);
        assert!(matches!(
            tokens.verify(&token),
            Err(AdminTokenError::NotAdmin)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = AdminTokens::new("s3cret", DAY, 0);
        assert!(tokens.verify("not.a.jwt").is_err());
    }
}

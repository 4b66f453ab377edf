//! JWT bearer-token signing.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::debug;

use crate::encoder::TokenEncoder;
use crate::error::Result;

/// Signs a short-lived JWT as the bearer token for each request.
///
/// Supports a shared secret (HS256) or an RSA private key in PEM format
/// (RS256). Claims are `iss`, `iat` and `exp`; expiration defaults to
/// 3 minutes.
#[derive(Clone)]
pub struct JwtEncoder {
    /// Issuer claim identifying this client to the service.
    issuer: String,
    key: EncodingKey,
    algorithm: Algorithm,
    /// Token expiration duration (default: 3 minutes).
    expiration: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl JwtEncoder {
    /// Create an encoder signing with a shared secret (HS256).
    pub fn from_secret(issuer: impl Into<String>, secret: &[u8]) -> Self {
        Self {
            issuer: issuer.into(),
            key: EncodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration: Duration::minutes(3),
        }
    }

    /// Create an encoder signing with an RSA private key in PEM format (RS256).
    pub fn from_rsa_pem(issuer: impl Into<String>, private_key: &[u8]) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(private_key)?;
        Ok(Self {
            issuer: issuer.into(),
            key,
            algorithm: Algorithm::RS256,
            expiration: Duration::minutes(3),
        })
    }

    /// Set the token expiration duration.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }
}

impl TokenEncoder for JwtEncoder {
    fn encode(&self) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.expiration;

        let claims = JwtClaims {
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        debug!(issuer = %self.issuer, "signing bearer token");

        let header = Header::new(self.algorithm);
        let token = encode(&header, &claims, &self.key)?;
        Ok(token)
    }
}

/// Claims carried by the signed token.
#[derive(Debug, Serialize)]
struct JwtClaims {
    /// Issuer.
    iss: String,
    /// Issued-at timestamp (seconds).
    iat: i64,
    /// Expiration timestamp (seconds).
    exp: i64,
}

//! Bearer token issuance and verification (JWT, HS256)

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // account id
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn account_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, account_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let svc = TokenService::new("test-secret", Duration::hours(1));
        let id = Uuid::new_v4();
        let token = svc.issue(id).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.account_id(), Some(id));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let a = TokenService::new("secret-a", Duration::hours(1));
        let b = TokenService::new("secret-b", Duration::hours(1));
        let token = a.issue(Uuid::new_v4()).unwrap();
        assert!(b.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway.
        let svc = TokenService::new("s", Duration::minutes(-5));
        let token = svc.issue(Uuid::new_v4()).unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let svc = TokenService::new("s", Duration::hours(1));
        assert!(svc.verify("not.a.jwt").is_err());
    }
}

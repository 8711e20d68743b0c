use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Role, User};
use super::AuthError;

/// JWT claims carried in `x-auth-token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }
}

/// HS256 token signing and verification with a shared secret.
#[derive(Clone)]
pub struct JwtAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Checks signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn issue(&self, user: &User, expires_in: Duration) -> Result<String, AuthError> {
        self.encode(&Claims::for_user(user, expires_in))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_round_trips_identity() {
        let auth = JwtAuth::new(b"test-secret");
        let user = User::new("Ana", "Paz", "ana@example.com").with_role(Role::ADMIN);
        let token = auth.issue(&user, Duration::hours(1)).unwrap();
        let claims = auth.decode(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert!(claims.role.is_admin());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = JwtAuth::new(b"test-secret");
        let user = User::new("Ana", "Paz", "ana@example.com");
        let token = auth.issue(&user, Duration::hours(-2)).unwrap();
        assert!(matches!(auth.decode(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let user = User::new("Ana", "Paz", "ana@example.com");
        let token = JwtAuth::new(b"someone-else").issue(&user, Duration::hours(1)).unwrap();
        assert!(matches!(JwtAuth::new(b"test-secret").decode(&token), Err(AuthError::InvalidToken(_))));
    }
}

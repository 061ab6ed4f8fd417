use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token time-to-live used by [`JwtAuth::create_token`]
pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // Subject (user ID)
    pub email: String, // User email
    pub name: String,  // User display name
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
}

/// The authenticated principal, resolved from verified JWT claims.
///
/// Inserted into request extensions by the auth middleware; handlers read it
/// with `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl TryFrom<JwtClaims> for AuthUser {
    type Error = uuid::Error;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&claims.sub)?,
            email: claims.email,
            name: claims.name,
        })
    }
}

/// Stateless JWT verification.
///
/// Sessions (issuance, refresh, revocation) live in the identity system;
/// this type only verifies signatures and expiry.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create a signed token for the given principal. Used by tests and
    /// local tooling; production tokens come from the identity system.
    pub fn create_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify the token signature and expiry, returning the decoded claims.
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(jsonwebtoken::Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-key-with-at-least-32-chars"))
    }

    #[test]
    fn test_token_roundtrip() {
        let auth = auth();
        let user_id = Uuid::new_v4();

        let token = auth
            .create_token(&user_id.to_string(), "organizer@example.com", "Org Anizer", 60)
            .unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "organizer@example.com");

        let user = AuthUser::try_from(claims).unwrap();
        assert_eq!(user.id, user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = auth();
        let token = auth
            .create_token(&Uuid::new_v4().to_string(), "a@b.c", "A", -120)
            .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = auth()
            .create_token(&Uuid::new_v4().to_string(), "a@b.c", "A", 60)
            .unwrap();

        let other = JwtAuth::new(&JwtConfig::new("another-secret-key-with-32-chars!!"));
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let claims = JwtClaims {
            sub: "not-a-uuid".to_string(),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            exp: 0,
            iat: 0,
        };

        assert!(AuthUser::try_from(claims).is_err());
    }
}

/// Token issuing and validation for Inkwell services
///
/// Access and refresh tokens are HS256 JWTs signed with *different* secrets,
/// so a leaked refresh secret cannot mint access tokens and a refresh token
/// can never be replayed as an access token.
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::JwtKeys;
/// use uuid::Uuid;
///
/// let keys = JwtKeys::from_secrets("access-secret-0123456789abcdef", "refresh-secret-0123456789abcdef", 3600, 86400)
///     .expect("valid secrets");
/// let user_id = Uuid::new_v4();
/// let pair = keys.generate_token_pair(user_id, 0).expect("token pair");
/// let claims = keys.validate_access_token(&pair.access_token).expect("valid token");
/// assert_eq!(claims.user_id().unwrap(), user_id);
/// ```
use anyhow::{anyhow, Result as AnyResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Secrets shorter than this are rejected at startup.
const MIN_SECRET_LEN: usize = 16;

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    pub token_type: TokenType,
    /// Account token version at issue time; bumping it revokes older tokens
    pub ver: i32,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Wrong token type: expected {expected}")]
    WrongType { expected: TokenType },

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

// ============================================================================
// Key Storage
// ============================================================================

/// Signing material and lifetimes for one service instance.
///
/// Built once at startup and shared through application state.
#[derive(Clone)]
pub struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("secrets", &"[REDACTED]")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

impl JwtKeys {
    /// Build keys from the two HMAC secrets.
    ///
    /// ## Errors
    ///
    /// - Either secret is shorter than 16 bytes
    /// - Both secrets are identical
    /// - A lifetime is not positive
    pub fn from_secrets(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> AnyResult<Self> {
        if access_secret.len() < MIN_SECRET_LEN || refresh_secret.len() < MIN_SECRET_LEN {
            return Err(anyhow!(
                "token secrets must be at least {MIN_SECRET_LEN} bytes"
            ));
        }
        if access_secret == refresh_secret {
            return Err(anyhow!("access and refresh token secrets must differ"));
        }
        if access_ttl_secs <= 0 || refresh_ttl_secs <= 0 {
            return Err(anyhow!("token lifetimes must be positive"));
        }

        Ok(Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        })
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    // ========================================================================
    // Token Generation
    // ========================================================================

    pub fn generate_access_token(&self, user_id: Uuid, version: i32) -> Result<String, TokenError> {
        self.sign(user_id, version, TokenType::Access, self.access_ttl_secs)
    }

    pub fn generate_refresh_token(&self, user_id: Uuid, version: i32) -> Result<String, TokenError> {
        self.sign(user_id, version, TokenType::Refresh, self.refresh_ttl_secs)
    }

    pub fn generate_token_pair(&self, user_id: Uuid, version: i32) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user_id, version)?,
            refresh_token: self.generate_refresh_token(user_id, version)?,
            expires_in: self.access_ttl_secs,
        })
    }

    fn sign(
        &self,
        user_id: Uuid,
        version: i32,
        token_type: TokenType,
        ttl_secs: i64,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            token_type,
            ver: version,
        };

        let key = match token_type {
            TokenType::Access => &self.access_encoding,
            TokenType::Refresh => &self.refresh_encoding,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    // ========================================================================
    // Token Validation
    // ========================================================================

    /// Validate an access token (signature, expiry, and `token_type == access`)
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Access)
    }

    /// Validate a refresh token (signature, expiry, and `token_type == refresh`)
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let key = match expected {
            TokenType::Access => &self.access_decoding,
            TokenType::Refresh => &self.refresh_decoding,
        };

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        let data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        if data.claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }

        Ok(data.claims)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS: &str = "test-access-secret-0123456789";
    const REFRESH: &str = "test-refresh-secret-0123456789";

    fn keys() -> JwtKeys {
        JwtKeys::from_secrets(ACCESS, REFRESH, 3600, 86_400).expect("valid test keys")
    }

    #[test]
    fn test_access_token_round_trip() {
        let keys = keys();
        let user_id = Uuid::new_v4();

        let token = keys.generate_access_token(user_id, 3).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let claims = keys.validate_access_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.ver, 3);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let keys = keys();
        let token = keys.generate_refresh_token(Uuid::new_v4(), 0).unwrap();

        // Signed with the refresh secret, so the access key cannot verify it at all
        assert_eq!(keys.validate_access_token(&token), Err(TokenError::Invalid));
        assert!(keys.validate_refresh_token(&token).is_ok());
    }

    #[test]
    fn test_token_type_claim_is_enforced() {
        // Same secret on both sides isolates the token_type check
        let keys = JwtKeys {
            access_encoding: EncodingKey::from_secret(ACCESS.as_bytes()),
            access_decoding: DecodingKey::from_secret(ACCESS.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(ACCESS.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(ACCESS.as_bytes()),
            access_ttl_secs: 60,
            refresh_ttl_secs: 60,
        };
        let token = keys.generate_refresh_token(Uuid::new_v4(), 0).unwrap();

        assert_eq!(
            keys.validate_access_token(&token),
            Err(TokenError::WrongType {
                expected: TokenType::Access
            })
        );
    }

    #[test]
    fn test_expired_token() {
        let keys = keys();
        // Beyond the default 60s leeway
        let token = keys
            .sign(Uuid::new_v4(), 0, TokenType::Access, -300)
            .unwrap();

        assert_eq!(keys.validate_access_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_token() {
        let keys = keys();
        let token = keys.generate_access_token(Uuid::new_v4(), 0).unwrap();
        let other = JwtKeys::from_secrets(
            "another-access-secret-xyz",
            "another-refresh-secret-xyz",
            3600,
            3600,
        )
        .unwrap();

        assert_eq!(other.validate_access_token(&token), Err(TokenError::Invalid));
        assert_eq!(keys.validate_access_token("not.a.jwt"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_secret_requirements() {
        assert!(JwtKeys::from_secrets("short", REFRESH, 60, 60).is_err());
        assert!(JwtKeys::from_secrets(ACCESS, ACCESS, 60, 60).is_err());
        assert!(JwtKeys::from_secrets(ACCESS, REFRESH, 0, 60).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", keys());
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains(ACCESS));
    }
}

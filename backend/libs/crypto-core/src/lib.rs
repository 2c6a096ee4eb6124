//! Shared token and password primitives for Inkwell services.
//!
//! - `jwt`: HS256 access/refresh token issuing and validation
//! - `password`: Argon2id hashing, verification and strength policy

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtKeys, TokenError, TokenPair, TokenType};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};

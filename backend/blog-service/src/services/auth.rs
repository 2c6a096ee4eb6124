/// Auth service - account creation, credential checks and token issuing
use crypto_core::{hash_password, verify_password, JwtKeys, TokenPair};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db::user_repo::{self, NewUser};
use crate::error::{conflict_on_unique, AppError, Result};
use crate::models::User;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Validated sign-up input
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub age: Option<i32>,
    pub profile_image: Option<&'a str>,
}

pub struct AuthService {
    pool: PgPool,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(pool: PgPool, keys: JwtKeys) -> Self {
        Self { pool, keys }
    }

    pub async fn sign_up(&self, registration: Registration<'_>) -> Result<(User, TokenPair)> {
        if user_repo::email_exists(&self.pool, registration.email).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }
        if user_repo::username_exists(&self.pool, registration.username).await? {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let password_hash = hash_password(registration.password)?;

        let user = user_repo::create_user(
            &self.pool,
            NewUser {
                username: registration.username,
                email: registration.email,
                password_hash: &password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
                age: registration.age,
                profile_image: registration.profile_image,
            },
        )
        .await
        .map_err(|e| conflict_on_unique(e, "Email or username is already in use"))?;

        let tokens = self.keys.generate_token_pair(user.id, user.token_version)?;
        info!(user_id = %user.id, "user signed up");

        Ok((user, tokens))
    }

    /// `login` is an email address or a username
    pub async fn login(&self, login: &str, password: &str) -> Result<(User, TokenPair)> {
        let user = user_repo::find_by_login(&self.pool, login)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "failed login attempt");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let tokens = self.keys.generate_token_pair(user.id, user.token_version)?;
        info!(user_id = %user.id, "user logged in");

        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        let claims = self.keys.validate_refresh_token(refresh_token)?;
        let user_id = claims.user_id()?;

        let user = user_repo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        if user.token_revoked(claims.ver) {
            return Err(AppError::Unauthorized(
                "User recently changed password, please log in again".to_string(),
            ));
        }

        Ok(self.keys.generate_access_token(user.id, user.token_version)?)
    }

    /// Replace the password and issue fresh tokens; older tokens stop working
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<TokenPair> {
        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Your current password is incorrect".to_string(),
            ));
        }
        if current_password == new_password {
            return Err(AppError::BadRequest(
                "New password must differ from the current password".to_string(),
            ));
        }

        let password_hash = hash_password(new_password)?;
        let token_version = user_repo::update_password(&self.pool, user.id, &password_hash).await?;
        info!(user_id = %user.id, token_version, "password changed");

        Ok(self.keys.generate_token_pair(user.id, token_version)?)
    }
}

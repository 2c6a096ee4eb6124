/// Auth handlers - sign-up, login, session cookies and password changes
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use crypto_core::{JwtKeys, TokenPair};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::models::UserProfile;
use crate::response::{self, ApiResponse};
use crate::services::{AuthService, Registration};
use crate::validators::{validate_not_blank, validate_username_shape};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(custom(function = "validate_username_shape"))]
    pub username: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// Strength is enforced when hashing
    pub password: String,
    #[validate(
        length(max = 100, message = "First name must be at most 100 characters"),
        custom(function = "validate_not_blank", message = "First name is required")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: String,
    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,
    #[validate(length(max = 2048, message = "Profile image reference is too long"))]
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address or username
    #[serde(alias = "username")]
    #[validate(custom(function = "validate_not_blank", message = "Email or username is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(alias = "oldPassword")]
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn auth_cookie(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

/// 200/201 response carrying the session cookies
fn session_response(
    status: StatusCode,
    tokens: TokenPair,
    refresh_ttl_secs: i64,
    user: UserProfile,
    config: &Config,
    message: &str,
) -> HttpResponse {
    let secure = config.auth.cookie_secure;
    HttpResponse::build(status)
        .cookie(auth_cookie(
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            tokens.expires_in,
            secure,
        ))
        .cookie(auth_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token,
            refresh_ttl_secs,
            secure,
        ))
        .json(ApiResponse::new(
            status,
            SessionResponse {
                user,
                token: tokens.access_token,
            },
            message,
        ))
}

/// Register a new account and start a session
pub async fn sign_up(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    config: web::Data<Config>,
    req: web::Json<SignUpRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone(), keys.get_ref().clone());
    let (user, tokens) = service
        .sign_up(Registration {
            username: req.username.trim(),
            email: req.email.trim(),
            password: &req.password,
            first_name: req.first_name.trim(),
            last_name: req.last_name.trim(),
            age: req.age,
            profile_image: req.profile_image.as_deref(),
        })
        .await?;

    Ok(session_response(
        StatusCode::CREATED,
        tokens,
        keys.refresh_ttl_secs(),
        UserProfile::from(&user),
        &config,
        "User registered successfully",
    ))
}

pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone(), keys.get_ref().clone());
    let (user, tokens) = service.login(req.email.trim(), &req.password).await?;

    Ok(session_response(
        StatusCode::OK,
        tokens,
        keys.refresh_ttl_secs(),
        UserProfile::from(&user),
        &config,
        "User logged in successfully",
    ))
}

pub async fn me(user: AuthUser) -> Result<HttpResponse> {
    Ok(response::ok(
        UserProfile::from(&user.0),
        "Current user fetched successfully",
    ))
}

/// Clear both session cookies; succeeds even without a session
pub async fn log_out(config: web::Data<Config>) -> Result<HttpResponse> {
    let secure = config.auth.cookie_secure;
    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(ACCESS_TOKEN_COOKIE, String::new(), 0, secure))
        .cookie(auth_cookie(REFRESH_TOKEN_COOKIE, String::new(), 0, secure))
        .json(ApiResponse::new(
            StatusCode::OK,
            (),
            "User logged out successfully",
        )))
}

/// Issue a new access token from the refresh cookie (or body)
pub async fn refresh_token(
    http_req: HttpRequest,
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    config: web::Data<Config>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse> {
    let token = http_req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token))
        .ok_or_else(|| AppError::Unauthorized("Refresh token is missing".to_string()))?;

    let service = AuthService::new((**pool).clone(), keys.get_ref().clone());
    let access_token = service.refresh_access_token(&token).await?;

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token.clone(),
            keys.access_ttl_secs(),
            config.auth.cookie_secure,
        ))
        .json(ApiResponse::new(
            StatusCode::OK,
            TokenResponse {
                token: access_token,
            },
            "Access token refreshed",
        )))
}

/// Change the caller's password; earlier tokens stop working
pub async fn change_password(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    config: web::Data<Config>,
    user: AuthUser,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone(), keys.get_ref().clone());
    let tokens = service
        .change_password(&user.0, &req.current_password, &req.new_password)
        .await?;

    Ok(session_response(
        StatusCode::OK,
        tokens,
        keys.refresh_ttl_secs(),
        UserProfile::from(&user.0),
        &config,
        "Password changed successfully",
    ))
}

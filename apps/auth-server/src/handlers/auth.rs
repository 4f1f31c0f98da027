//! Authentication handlers.

use actix_web::{HttpResponse, web};

use authd_core::domain::User;
use authd_core::service::{Authenticated, LoginRequest, RegisterRequest};
use authd_shared::dto;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn profile(user: &User) -> dto::UserProfile {
    dto::UserProfile {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_active: user.is_active,
        created_at: user.created_at,
        updated_at: user.updated_at,
        last_login_at: user.last_login_at,
    }
}

fn auth_response(auth: Authenticated) -> dto::AuthResponse {
    dto::AuthResponse {
        access_token: auth.access_token,
        refresh_token: auth.refresh_token,
        user: profile(&auth.user),
        expires_in: auth.expires_in,
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<dto::RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input shape before the service sees it
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if req.username.len() < 3 || req.username.len() > 50 {
        return Err(AppError::BadRequest(
            "Username must be between 3 and 50 characters".to_string(),
        ));
    }

    let auth = state
        .credentials
        .register(RegisterRequest {
            email: req.email,
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok(HttpResponse::Created().json(auth_response(auth)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<dto::LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let auth = state
        .credentials
        .login(LoginRequest {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Ok().json(auth_response(auth)))
}

/// POST /api/auth/refresh
pub async fn refresh(
    state: web::Data<AppState>,
    body: web::Json<dto::RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let auth = state
        .credentials
        .refresh_token(&body.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(auth_response(auth)))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(profile(&identity.user)))
}

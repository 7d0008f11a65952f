//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use blogicum_core::domain::{Profile, User};
use blogicum_core::ports::{AuthError, PasswordService, TokenService};
use blogicum_core::validation::{FieldErrors, check_registration};
use blogicum_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let profile = Profile {
        username: req.username.trim().to_string(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email.trim().to_string(),
    };

    let mut errors = FieldErrors::new();
    check_registration(&mut errors, &profile, &req.password);
    if state.users.find_by_username(&profile.username).await?.is_some() {
        errors.add("username", "A user with that username already exists");
    }
    errors.into_result()?;

    let password_hash = password_service.hash(&req.password)?;

    let user = state.users.insert(User::new(profile, password_hash)).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let token = token_service.generate_token(user.id, &user.username, user.roles())?;

    Ok(HttpResponse::Created().json(auth_response(token, token_service.get_ref())))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let valid_user = match state.users.find_by_username(req.username.trim()).await? {
        Some(user) => password_service
            .verify(&req.password, &user.password_hash)?
            .then_some(user),
        None => {
            password_service.reject_unknown_user(&req.password);
            None
        }
    };

    let user = valid_user.ok_or_else(|| {
        tracing::warn!(username = %req.username, "Login rejected");
        AppError::from(AuthError::InvalidCredentials)
    })?;

    let token = token_service.generate_token(user.id, &user.username, user.roles())?;

    Ok(HttpResponse::Ok().json(auth_response(token, token_service.get_ref())))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(views::user(&user)))
}

fn auth_response(access_token: String, token_service: &Arc<dyn TokenService>) -> AuthResponse {
    AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    }
}

//! Profile handlers.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::Profile;
use blogicum_core::policy::listing_filter;
use blogicum_core::validation::{FieldErrors, check_profile};
use blogicum_core::{ListingScope, POSTS_PER_PAGE, PageRequest};
use blogicum_shared::dto::{PageQuery, ProfilePageResponse, UpdateProfileRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/profile/{username}
///
/// Owners see every post they wrote, scheduled and unpublished included.
pub async fn profile_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_username(&path)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let filter = listing_filter(
        &viewer.viewer(),
        ListingScope::Profile(user.id),
        state.clock.now(),
    );
    let page = state
        .posts
        .list(&filter, POSTS_PER_PAGE, PageRequest::parse(query.page()))
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePageResponse {
        profile: views::public_profile(&user),
        posts: views::post_page(page),
    }))
}

/// PUT /api/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let req = body.into_inner();
    let profile = Profile {
        username: req.username.trim().to_string(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email.trim().to_string(),
    };

    let mut errors = FieldErrors::new();
    check_profile(&mut errors, &profile);
    if profile.username != user.username
        && state
            .users
            .find_by_username(&profile.username)
            .await?
            .is_some()
    {
        errors.add("username", "A user with that username already exists");
    }
    errors.into_result()?;

    user.apply_profile(profile);
    let user = state.users.update(user).await?;
    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(HttpResponse::Ok().json(views::user(&user)))
}

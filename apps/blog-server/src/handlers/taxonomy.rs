//! Category and location handlers.

use actix_web::{HttpResponse, web};

use blogicum_core::policy::listing_filter;
use blogicum_core::{ListingScope, POSTS_PER_PAGE, PageRequest};
use blogicum_shared::dto::{CategoryPageResponse, PageQuery};

use super::views;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/category/{slug}
///
/// Hidden categories do not exist as far as readers are concerned.
pub async fn category_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .find_by_slug(&path)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::not_found("Category"))?;

    let filter = listing_filter(
        &viewer.viewer(),
        ListingScope::Category(category.id),
        state.clock.now(),
    );
    let page = state
        .posts
        .list(&filter, POSTS_PER_PAGE, PageRequest::parse(query.page()))
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPageResponse {
        category: views::category(&category),
        posts: views::post_page(page),
    }))
}

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list_published().await?;
    let body: Vec<_> = categories.iter().map(views::category).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/locations
pub async fn list_locations(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let locations = state.locations.list_published().await?;
    let body: Vec<_> = locations.iter().map(views::location).collect();
    Ok(HttpResponse::Ok().json(body))
}

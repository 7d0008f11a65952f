//! Staff-only management of reference data.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::{Category, Location};
use blogicum_core::validation::{FieldErrors, check_category, validate_location};
use blogicum_shared::dto::{CategoryRequest, LocationRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const STAFF_ROLE: &str = "staff";

fn require_staff(identity: &Identity) -> AppResult<()> {
    if identity.has_role(STAFF_ROLE) {
        Ok(())
    } else {
        tracing::warn!(user = %identity.username, "Staff route denied");
        Err(AppError::Forbidden)
    }
}

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;

    let req = body.into_inner();
    let title = req.title.trim().to_string();
    let slug = req.slug.trim().to_string();

    let mut errors = FieldErrors::new();
    check_category(&mut errors, &title, &slug);
    if state.categories.find_by_slug(&slug).await?.is_some() {
        errors.add("slug", "A category with that slug already exists");
    }
    errors.into_result()?;

    let category = state
        .categories
        .insert(Category::new(title, req.description, slug, req.is_published))
        .await?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(views::category(&category)))
}

/// POST /api/admin/locations
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;

    let req = body.into_inner();
    let name = req.name.trim().to_string();
    validate_location(&name)?;

    let location = state
        .locations
        .insert(Location::new(name, req.is_published))
        .await?;
    tracing::info!(location_id = %location.id, "Location created");

    Ok(HttpResponse::Created().json(views::location(&location)))
}

//! Post handlers: timeline, detail, create, edit, delete.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use blogicum_core::domain::{Post, PostDraft, PostRecord};
use blogicum_core::policy::{can_read, can_write, listing_filter};
use blogicum_core::validation::{FieldErrors, check_post};
use blogicum_core::{ListingScope, POSTS_PER_PAGE, PageRequest, Viewer};
use blogicum_shared::dto::{PageQuery, PostDetailResponse, PostRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let filter = listing_filter(&viewer.viewer(), ListingScope::Index, state.clock.now());
    let page = state
        .posts
        .list(&filter, POSTS_PER_PAGE, PageRequest::parse(query.page()))
        .await?;

    Ok(HttpResponse::Ok().json(views::post_page(page)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let now = state.clock.now();
    let draft = draft_from(body.into_inner(), now);
    validate_draft(&state, &draft).await?;

    let post = state.posts.insert(Post::new(identity.user_id, draft)).await?;
    tracing::info!(post_id = %post.id, author = %identity.username, "Post created");

    let record = load_record(&state, post.id).await?;
    Ok(HttpResponse::Created().json(views::post(&record)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let viewer = viewer.viewer();
    let record = readable_record(&state, &viewer, path.into_inner()).await?;
    let comments = state.comments.list_for_post(record.post.id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: views::post(&record),
        comments: comments.iter().map(views::comment).collect(),
        editable: can_write(&viewer, &record),
    }))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let record = readable_record(&state, &viewer, path.into_inner()).await?;
    if !can_write(&viewer, &record) {
        tracing::warn!(post_id = %record.post.id, user = %identity.username, "Post edit denied");
        return Err(AppError::Forbidden);
    }

    let current_pub_date = record.post.pub_date;
    let draft = draft_from(body.into_inner(), current_pub_date);
    validate_draft(&state, &draft).await?;

    let mut post = record.post;
    post.apply(draft);
    let post = state
        .posts
        .update_owned(post, identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post"))?;
    tracing::info!(post_id = %post.id, "Post updated");

    let record = load_record(&state, post.id).await?;
    Ok(HttpResponse::Ok().json(views::post(&record)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let record = readable_record(&state, &viewer, path.into_inner()).await?;
    if !can_write(&viewer, &record) {
        tracing::warn!(post_id = %record.post.id, user = %identity.username, "Post delete denied");
        return Err(AppError::Forbidden);
    }

    if !state
        .posts
        .delete_owned(record.post.id, identity.user_id)
        .await?
    {
        return Err(AppError::not_found("Post"));
    }
    tracing::info!(post_id = %record.post.id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Load a post the viewer may read. Anything else is reported as missing.
pub(super) async fn readable_record(
    state: &AppState,
    viewer: &Viewer,
    id: Uuid,
) -> AppResult<PostRecord> {
    state
        .posts
        .find_record(id)
        .await?
        .filter(|record| can_read(viewer, record, state.clock.now()))
        .ok_or_else(|| AppError::not_found("Post"))
}

async fn load_record(state: &AppState, id: Uuid) -> AppResult<PostRecord> {
    state
        .posts
        .find_record(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post"))
}

/// A missing `pub_date` falls back to `default_pub_date`.
fn draft_from(req: PostRequest, default_pub_date: DateTime<Utc>) -> PostDraft {
    PostDraft {
        title: req.title.trim().to_string(),
        text: req.text,
        pub_date: req.pub_date.unwrap_or(default_pub_date),
        is_published: req.is_published,
        category_id: req.category_id,
        location_id: req.location_id,
    }
}

/// Field checks plus existence of the referenced category and location.
async fn validate_draft(state: &AppState, draft: &PostDraft) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    check_post(&mut errors, draft);

    if let Some(id) = draft.category_id {
        if state.categories.find_by_id(id).await?.is_none() {
            errors.add("category_id", "Select a valid choice");
        }
    }
    if let Some(id) = draft.location_id {
        if state.locations.find_by_id(id).await?.is_none() {
            errors.add("location_id", "Select a valid choice");
        }
    }

    errors.into_result().map_err(AppError::from)
}

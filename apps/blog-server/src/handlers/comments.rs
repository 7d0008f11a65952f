//! Comment handlers. Every route is nested under its parent post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::domain::{AuthorRef, Comment, CommentRecord};
use blogicum_core::policy::{can_comment, can_write};
use blogicum_core::validation::validate_comment;
use blogicum_shared::dto::CommentRequest;

use super::posts::readable_record;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let post_id = path.into_inner();
    let record = state
        .posts
        .find_record(post_id)
        .await?
        .filter(|record| can_comment(&viewer, record, state.clock.now()))
        .ok_or_else(|| AppError::not_found("Post"))?;

    let text = body.into_inner().text;
    validate_comment(&text)?;

    let author = current_author(&state, &identity).await?;
    let comment = state
        .comments
        .insert(Comment::new(record.post.id, identity.user_id, text))
        .await?;
    tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment added");

    Ok(HttpResponse::Created().json(views::comment(&CommentRecord { comment, author })))
}

/// PUT /api/posts/{id}/comments/{comment_id}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let mut comment = owned_comment(&state, &identity, post_id, comment_id).await?;

    let text = body.into_inner().text;
    validate_comment(&text)?;

    comment.text = text;
    let comment = state
        .comments
        .update_owned(comment, identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment"))?;
    tracing::info!(comment_id = %comment.id, "Comment updated");

    let author = current_author(&state, &identity).await?;
    Ok(HttpResponse::Ok().json(views::comment(&CommentRecord { comment, author })))
}

/// DELETE /api/posts/{id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = owned_comment(&state, &identity, post_id, comment_id).await?;

    if !state
        .comments
        .delete_owned(comment.id, identity.user_id)
        .await?
    {
        return Err(AppError::not_found("Comment"));
    }
    tracing::info!(comment_id = %comment.id, "Comment deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// A comment under a readable post, which the caller wrote.
///
/// Unknown comments and comments filed under another post are missing;
/// somebody else's comment is forbidden.
async fn owned_comment(
    state: &AppState,
    identity: &Identity,
    post_id: Uuid,
    comment_id: Uuid,
) -> AppResult<Comment> {
    let viewer = identity.viewer();
    readable_record(state, &viewer, post_id).await?;

    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| AppError::not_found("Comment"))?;

    if !can_write(&viewer, &comment) {
        tracing::warn!(%comment_id, user = %identity.username, "Comment change denied");
        return Err(AppError::Forbidden);
    }

    Ok(comment)
}

/// The caller's current handle. Tokens may predate a username change.
async fn current_author(state: &AppState, identity: &Identity) -> AppResult<AuthorRef> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .map(|user| AuthorRef::from(&user))
        .ok_or(AppError::Unauthorized)
}

//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod comments;
mod health;
mod posts;
mod profile;
mod taxonomy;
mod views;


use actix_web::{
    HttpRequest,
    error::{JsonPayloadError, QueryPayloadError},
    web,
};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Posts and their comments
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::put().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post))
                        .route("/{id}/comments", web::post().to(comments::add_comment))
                        .route(
                            "/{id}/comments/{comment_id}",
                            web::put().to(comments::update_comment),
                        )
                        .route(
                            "/{id}/comments/{comment_id}",
                            web::delete().to(comments::delete_comment),
                        ),
                )
                // Reference data
                .route("/category/{slug}", web::get().to(taxonomy::category_posts))
                .route("/categories", web::get().to(taxonomy::list_categories))
                .route("/locations", web::get().to(taxonomy::list_locations))
                // Profiles
                .route("/profile", web::put().to(profile::update_profile))
                .route("/profile/{username}", web::get().to(profile::profile_posts))
                // Staff routes
                .service(
                    web::scope("/admin")
                        .route("/categories", web::post().to(admin::create_category))
                        .route("/locations", web::post().to(admin::create_location)),
                ),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

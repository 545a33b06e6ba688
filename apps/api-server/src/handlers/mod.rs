//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::{HttpResponse, guard, web};
use blog_core::ports::RateLimiter;
use blog_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// `limiter` throttles the credential endpoints (login and registration).
pub fn configure_routes(
    limiter: Option<Arc<dyn RateLimiter>>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
            tracing::debug!("Rejected path parameter: {}", err);
            AppError::BadRequest("malformatted id".to_string()).into()
        }))
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::resource("/login")
                        .wrap(RateLimitMiddleware::new(limiter.clone()))
                        .route(web::post().to(auth::login)),
                )
                .service(
                    web::resource("/users")
                        .guard(guard::Post())
                        .wrap(RateLimitMiddleware::new(limiter))
                        .route(web::post().to(users::register)),
                )
                .route("/users", web::get().to(users::list_users))
                .route("/users/{id}", web::get().to(users::get_user))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/stats", web::get().to(posts::stats))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::put().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post))
                        .route("/{id}/like", web::post().to(posts::like_post)),
                ),
        );
    }
}

/// Fallback for unmatched routes.
pub async fn unknown_endpoint() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::unknown_endpoint())
}

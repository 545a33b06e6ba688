//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_shared::dto::{CreatePostRequest, PostResponse, StatsResponse, UpdatePostRequest};

use crate::middleware::auth::Caller;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts - most liked first.
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .list_posts()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let details = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(details)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    Caller(caller): Caller,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let details = state
        .posts
        .create_post(&caller, body.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(PostResponse::from(details)))
}

/// PUT /api/posts/{id}
///
/// A `likes` value above the current count likes the post; any other body
/// is an owner-only update.
pub async fn update_post(
    state: web::Data<AppState>,
    Caller(caller): Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let details = state
        .posts
        .apply_put(&caller, path.into_inner(), body.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(details)))
}

/// POST /api/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    Caller(caller): Caller,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let details = state.posts.like_once(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(details)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    Caller(caller): Caller,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete_post(&caller, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts/stats
pub async fn stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stats = state.posts.stats().await?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_likes: stats.total_likes,
        favorite: stats.favorite.map(Into::into),
        most_posts: stats.most_posts.map(Into::into),
    }))
}

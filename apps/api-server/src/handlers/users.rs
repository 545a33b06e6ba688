//! User handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_shared::dto::{RegisterUserRequest, UserResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .accounts
        .list_users()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let details = state.accounts.user_details(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(details)))
}

/// POST /api/users
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let user = state.accounts.register(body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

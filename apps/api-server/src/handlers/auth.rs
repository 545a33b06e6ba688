//! Login handler.

use actix_web::{HttpResponse, web};

use blog_shared::dto::{LoginRequest, LoginResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state.accounts.login(&req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: session.token,
        username: session.user.username,
        name: session.user.name,
    }))
}

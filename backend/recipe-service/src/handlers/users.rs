use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::UserRead;
use crate::services::USER_NOT_FOUND;

/// Profile of the authenticated user
/// GET /api/v1/users/me
pub async fn get_current_user(state: web::Data<AppState>, user: UserId) -> Result<HttpResponse> {
    let user = state
        .users
        .find_by_id(user.0)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(UserRead::from(user)))
}

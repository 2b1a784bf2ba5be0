use actix_web::{web, HttpRequest, HttpResponse};
use std::collections::HashMap;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::Result;
use crate::handlers::page_response;
use crate::middleware::UserId;
use crate::models::FavoriteWrite;
use crate::pagination::PageRequest;

/// Add a recipe to favorites
/// POST /api/v1/recipes/{recipe_id}/favorite
pub async fn add_favorite(
    state: web::Data<AppState>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let input = FavoriteWrite {
        user: Some(user.0),
        recipe: path.into_inner(),
    };
    let recipe = state.favorite_service().add_favorite(user.0, input).await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// Remove a recipe from favorites
/// DELETE /api/v1/recipes/{recipe_id}/favorite
pub async fn remove_favorite(
    state: web::Data<AppState>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .favorite_service()
        .remove_favorite(user.0, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a favorite from a `{"recipe": ..., "user": ...}` body
/// POST /api/v1/favorites
pub async fn create_favorite(
    state: web::Data<AppState>,
    user: UserId,
    body: web::Json<FavoriteWrite>,
) -> Result<HttpResponse> {
    let recipe = state
        .favorite_service()
        .add_favorite(user.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// List the caller's favorite recipes
/// GET /api/v1/favorites
pub async fn list_favorites(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: UserId,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse> {
    let page = PageRequest::from_query(&query, &state.pagination)?;
    let favorites = state.favorite_service().list_favorites(user.0, page).await?;

    Ok(HttpResponse::Ok().json(page_response(
        &req,
        favorites,
        &state.pagination.page_query_param,
    )))
}

use actix_web::{web, HttpRequest, HttpResponse};
use std::collections::HashMap;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::handlers::page_response;
use crate::middleware::UserId;
use crate::models::{CreateRecipeRequest, RecipeFilter};
use crate::pagination::PageRequest;

/// Parse `author` and `is_favorited` list filters
///
/// `is_favorited` accepts `1`/`true` and `0`/`false`.
pub(crate) fn parse_recipe_filter(query: &HashMap<String, String>) -> Result<RecipeFilter> {
    let author = match query.get("author").map(|raw| raw.trim()) {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| AppError::BadRequest(format!("Invalid author id: {}", raw)))?,
        ),
    };

    let is_favorited = match query.get("is_favorited").map(|raw| raw.trim()) {
        None | Some("") => None,
        Some("1") | Some("true") => Some(true),
        Some("0") | Some("false") => Some(false),
        Some(raw) => {
            return Err(AppError::BadRequest(format!(
                "Invalid is_favorited value: {}",
                raw
            )))
        }
    };

    Ok(RecipeFilter {
        author,
        is_favorited,
    })
}

/// List recipes, newest first
/// GET /api/v1/recipes
pub async fn list_recipes(
    req: HttpRequest,
    state: web::Data<AppState>,
    viewer: Option<UserId>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse> {
    let filter = parse_recipe_filter(&query)?;
    let page = PageRequest::from_query(&query, &state.pagination)?;

    let recipes = state
        .recipe_service()
        .list(viewer.map(|v| v.0), filter, page)
        .await?;

    Ok(HttpResponse::Ok().json(page_response(
        &req,
        recipes,
        &state.pagination.page_query_param,
    )))
}

/// GET /api/v1/recipes/{recipe_id}
pub async fn get_recipe(
    state: web::Data<AppState>,
    viewer: Option<UserId>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let recipe = state
        .recipe_service()
        .get(path.into_inner(), viewer.map(|v| v.0))
        .await?;
    Ok(HttpResponse::Ok().json(recipe))
}

/// POST /api/v1/recipes
pub async fn create_recipe(
    state: web::Data<AppState>,
    user: UserId,
    body: web::Json<CreateRecipeRequest>,
) -> Result<HttpResponse> {
    let recipe = state
        .recipe_service()
        .create(user.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// DELETE /api/v1/recipes/{recipe_id}
pub async fn delete_recipe(
    state: web::Data<AppState>,
    user: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .recipe_service()
        .delete(path.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Data models for recipe-service
///
/// Row types (`User`, `Recipe`, `Favorite`) map 1:1 onto tables; the `*Read`
/// types and `RecipeShort` are the JSON representations handlers return.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Favorite entity - a user marking a recipe, unique per (user, recipe)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Public user representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserRead {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Compact recipe representation used by favorite responses and listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecipeShort {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeShort {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Full recipe representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRead {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub author: UserRead,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
}

/// Recipe row joined with its author and the caller's favorite flag
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeWithAuthor {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_email: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub is_favorited: bool,
}

impl From<RecipeWithAuthor> for RecipeRead {
    fn from(row: RecipeWithAuthor) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image: row.image,
            text: row.text,
            cooking_time: row.cooking_time,
            author: UserRead {
                id: row.author_id,
                username: row.author_username,
                email: row.author_email,
                first_name: row.author_first_name,
                last_name: row.author_last_name,
            },
            is_favorited: row.is_favorited,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
    #[validate(length(min = 1, max = 500, message = "Image must be 1-500 characters"))]
    pub image: String,
    #[validate(range(min = 1, max = 32000, message = "Cooking time must be 1-32000 minutes"))]
    pub cooking_time: i32,
}

/// Write-side favorite input: `{"user": ..., "recipe": ...}`
///
/// `user` may be omitted in request bodies; it always resolves to the
/// authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteWrite {
    #[serde(default)]
    pub user: Option<Uuid>,
    pub recipe: Uuid,
}

/// Filters accepted by the recipe list endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<Uuid>,
    /// `Some(true)`: only the viewer's favorites, `Some(false)`: exclude them
    pub is_favorited: Option<bool>,
}

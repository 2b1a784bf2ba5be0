/// Business logic layer sitting between handlers and repositories
pub mod favorites;
pub mod recipes;

pub use favorites::FavoriteService;
pub use recipes::RecipeService;

use crate::error::AppError;

/// Foreign key from favorites to the recipe being favorited
const FAVORITE_RECIPE_FK: &str = "favorites_recipe_id_fkey";

pub const USER_NOT_FOUND: &str = "User not found";

/// Turn a foreign key violation on insert into a 404 for the missing row
///
/// Only the favorite's recipe reference points at a recipe; every other
/// foreign key on insert (favorite owner, recipe author) points at `users`.
pub(crate) fn map_foreign_key_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return if db_err.constraint() == Some(FAVORITE_RECIPE_FK) {
                AppError::NotFound(favorites::RECIPE_NOT_FOUND.to_string())
            } else {
                AppError::NotFound(USER_NOT_FOUND.to_string())
            };
        }
    }
    AppError::Database(err)
}

/// Favorite service - adding, removing and listing a user's favorite recipes
use crate::db::{FavoriteRepository, RecipeRepository};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{FavoriteWrite, RecipeShort};
use crate::pagination::{PageRequest, Paginated};
use crate::services::map_foreign_key_violation;
use std::sync::Arc;
use uuid::Uuid;

pub const ALREADY_IN_FAVORITES: &str = "This recipe is already in favorites.";
pub const NOT_IN_FAVORITES: &str = "This recipe is not in favorites.";
pub const RECIPE_NOT_FOUND: &str = "Recipe not found";

#[derive(Clone)]
pub struct FavoriteService {
    recipes: Arc<dyn RecipeRepository>,
    favorites: Arc<dyn FavoriteRepository>,
}

impl FavoriteService {
    pub fn new(recipes: Arc<dyn RecipeRepository>, favorites: Arc<dyn FavoriteRepository>) -> Self {
        Self { recipes, favorites }
    }

    /// Add a recipe to the caller's favorites
    ///
    /// Answers with the recipe's short representation rather than the
    /// favorite row itself.
    pub async fn add_favorite(&self, caller: Uuid, input: FavoriteWrite) -> Result<RecipeShort> {
        if input.user.is_some_and(|user| user != caller) {
            return Err(AppError::Authorization(
                "Cannot add favorites on behalf of another user".to_string(),
            ));
        }

        let recipe = self
            .recipes
            .find_by_id(input.recipe)
            .await?
            .ok_or_else(|| AppError::NotFound(RECIPE_NOT_FOUND.to_string()))?;

        if self.favorites.exists(caller, recipe.id).await? {
            metrics::record_favorite("add", "rejected");
            return Err(AppError::Validation(ALREADY_IN_FAVORITES.to_string()));
        }

        match self.favorites.insert(caller, recipe.id).await {
            Ok(Some(favorite)) => {
                metrics::record_favorite("add", "success");
                tracing::info!(
                    user_id = %caller,
                    recipe_id = %recipe.id,
                    favorite_id = %favorite.id,
                    "recipe added to favorites"
                );
                Ok(RecipeShort::from(&recipe))
            }
            // Lost a race with a concurrent insert of the same pair
            Ok(None) => {
                metrics::record_favorite("add", "rejected");
                Err(AppError::Validation(ALREADY_IN_FAVORITES.to_string()))
            }
            Err(e) => Err(map_foreign_key_violation(e)),
        }
    }

    /// Remove a recipe from the caller's favorites
    pub async fn remove_favorite(&self, caller: Uuid, recipe_id: Uuid) -> Result<()> {
        if self.recipes.find_by_id(recipe_id).await?.is_none() {
            return Err(AppError::NotFound(RECIPE_NOT_FOUND.to_string()));
        }

        if !self.favorites.delete(caller, recipe_id).await? {
            metrics::record_favorite("remove", "rejected");
            return Err(AppError::Validation(NOT_IN_FAVORITES.to_string()));
        }

        metrics::record_favorite("remove", "success");
        tracing::info!(user_id = %caller, recipe_id = %recipe_id, "recipe removed from favorites");
        Ok(())
    }

    /// One page of the caller's favorite recipes
    pub async fn list_favorites(
        &self,
        caller: Uuid,
        page: PageRequest,
    ) -> Result<Paginated<RecipeShort>> {
        let count = self.favorites.count_for_user(caller).await?.max(0) as u64;
        let window = page.resolve(count)?;

        let items = self
            .favorites
            .list_recipes_for_user(caller, window.limit(), window.offset())
            .await?;

        Ok(Paginated {
            items,
            count,
            window,
        })
    }
}

use crate::db::RecipeRepository;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{CreateRecipeRequest, RecipeFilter, RecipeRead};
use crate::pagination::{PageRequest, Paginated};
use crate::services::favorites::RECIPE_NOT_FOUND;
use crate::services::map_foreign_key_violation;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
}

impl RecipeService {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    pub async fn list(
        &self,
        viewer: Option<Uuid>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Paginated<RecipeRead>> {
        let count = self.recipes.count(filter, viewer).await?.max(0) as u64;
        let window = page.resolve(count)?;

        let rows = self
            .recipes
            .list(filter, viewer, window.limit(), window.offset())
            .await?;

        Ok(Paginated {
            items: rows.into_iter().map(RecipeRead::from).collect(),
            count,
            window,
        })
    }

    pub async fn get(&self, recipe_id: Uuid, viewer: Option<Uuid>) -> Result<RecipeRead> {
        self.recipes
            .find_read(recipe_id, viewer)
            .await?
            .map(RecipeRead::from)
            .ok_or_else(|| AppError::NotFound(RECIPE_NOT_FOUND.to_string()))
    }

    pub async fn create(&self, author_id: Uuid, input: CreateRecipeRequest) -> Result<RecipeRead> {
        input.validate()?;

        let recipe = self
            .recipes
            .create(author_id, input)
            .await
            .map_err(map_foreign_key_violation)?;

        metrics::record_recipe("create");
        tracing::info!(recipe_id = %recipe.id, author_id = %author_id, "recipe created");

        self.get(recipe.id, Some(author_id)).await
    }

    /// Only the author may delete a recipe; its favorites go with it
    pub async fn delete(&self, recipe_id: Uuid, caller: Uuid) -> Result<()> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| AppError::NotFound(RECIPE_NOT_FOUND.to_string()))?;

        if recipe.author_id != caller {
            return Err(AppError::Authorization(
                "Only the author can delete this recipe".to_string(),
            ));
        }

        if !self.recipes.delete(recipe_id).await? {
            return Err(AppError::NotFound(RECIPE_NOT_FOUND.to_string()));
        }

        metrics::record_recipe("delete");
        tracing::info!(recipe_id = %recipe_id, author_id = %caller, "recipe deleted");
        Ok(())
    }
}

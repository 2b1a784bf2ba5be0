use crate::models::{CreateRecipeRequest, Recipe, RecipeFilter, RecipeWithAuthor};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, recipe_id: Uuid) -> Result<Option<Recipe>, sqlx::Error>;

    /// Recipe with author and the viewer's favorite flag (`false` for anonymous)
    async fn find_read(
        &self,
        recipe_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<RecipeWithAuthor>, sqlx::Error>;

    async fn count(&self, filter: RecipeFilter, viewer: Option<Uuid>) -> Result<i64, sqlx::Error>;

    /// Newest recipes first
    async fn list(
        &self,
        filter: RecipeFilter,
        viewer: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeWithAuthor>, sqlx::Error>;

    async fn create(
        &self,
        author_id: Uuid,
        recipe: CreateRecipeRequest,
    ) -> Result<Recipe, sqlx::Error>;

    async fn delete(&self, recipe_id: Uuid) -> Result<bool, sqlx::Error>;
}

/// Repository for Recipe operations
#[derive(Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// $1 = viewer (nullable); comparing against NULL never matches, so anonymous
// viewers see is_favorited = false and an `is_favorited=true` filter is empty.
const SELECT_RECIPE_WITH_AUTHOR: &str = r#"
    SELECT r.id, r.name, r.image, r.text, r.cooking_time, r.created_at,
           u.id AS author_id,
           u.username AS author_username,
           u.email AS author_email,
           u.first_name AS author_first_name,
           u.last_name AS author_last_name,
           EXISTS(
               SELECT 1 FROM favorites f
               WHERE f.recipe_id = r.id AND f.user_id = $1
           ) AS is_favorited
    FROM recipes r
    JOIN users u ON u.id = r.author_id
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($2::uuid IS NULL OR r.author_id = $2)
      AND (
          $3::boolean IS NULL
          OR EXISTS(
              SELECT 1 FROM favorites f
              WHERE f.recipe_id = r.id AND f.user_id = $1
          ) = $3
      )
"#;

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn find_by_id(&self, recipe_id: Uuid) -> Result<Option<Recipe>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, author_id, name, text, image, cooking_time, created_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_read(
        &self,
        recipe_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<RecipeWithAuthor>, sqlx::Error> {
        let sql = format!("{SELECT_RECIPE_WITH_AUTHOR} WHERE r.id = $2");
        sqlx::query_as::<_, RecipeWithAuthor>(&sql)
            .bind(viewer)
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn count(&self, filter: RecipeFilter, viewer: Option<Uuid>) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM recipes r {FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(viewer)
            .bind(filter.author)
            .bind(filter.is_favorited)
            .fetch_one(&self.pool)
            .await
    }

    async fn list(
        &self,
        filter: RecipeFilter,
        viewer: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeWithAuthor>, sqlx::Error> {
        let sql = format!(
            "{SELECT_RECIPE_WITH_AUTHOR} {FILTER_CLAUSE} \
             ORDER BY r.created_at DESC, r.id \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, RecipeWithAuthor>(&sql)
            .bind(viewer)
            .bind(filter.author)
            .bind(filter.is_favorited)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn create(
        &self,
        author_id: Uuid,
        recipe: CreateRecipeRequest,
    ) -> Result<Recipe, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (author_id, name, text, image, cooking_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, name, text, image, cooking_time, created_at
            "#,
        )
        .bind(author_id)
        .bind(recipe.name)
        .bind(recipe.text)
        .bind(recipe.image)
        .bind(recipe.cooking_time)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete(&self, recipe_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

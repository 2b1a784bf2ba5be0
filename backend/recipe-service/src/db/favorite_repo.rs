use crate::models::{Favorite, RecipeShort};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Check if the user has already favorited the recipe
    async fn exists(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool, sqlx::Error>;

    /// Insert a favorite, returning `None` when the pair already exists
    async fn insert(&self, user_id: Uuid, recipe_id: Uuid)
        -> Result<Option<Favorite>, sqlx::Error>;

    /// Delete a favorite, returning whether a row was removed
    async fn delete(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool, sqlx::Error>;

    async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Favorited recipes of a user, most recently favorited first
    async fn list_recipes_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeShort>, sqlx::Error>;
}

/// Repository for Favorite operations
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn exists(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM favorites
                WHERE user_id = $1 AND recipe_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> Result<Option<Favorite>, sqlx::Error> {
        // The UNIQUE (user_id, recipe_id) constraint settles concurrent inserts
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, recipe_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            RETURNING id, user_id, recipe_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE user_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn list_recipes_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeShort>, sqlx::Error> {
        sqlx::query_as::<_, RecipeShort>(
            r#"
            SELECT r.id, r.name, r.image, r.cooking_time
            FROM favorites f
            JOIN recipes r ON r.id = f.recipe_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC, f.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }
}

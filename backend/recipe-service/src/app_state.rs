//! Shared application state handed to every handler

use crate::config::Config;
use crate::db::{
    FavoriteRepository, PgFavoriteRepository, PgRecipeRepository, PgUserRepository,
    RecipeRepository, UserRepository,
};
use crate::pagination::PaginationConfig;
use crate::security::JwtKeys;
use crate::services::{FavoriteService, RecipeService};
use sqlx::PgPool;
use std::sync::Arc;

/// Repositories sit behind traits so handler tests can swap in mocks
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub users: Arc<dyn UserRepository>,
    pub jwt: Arc<JwtKeys>,
    pub pagination: Arc<PaginationConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            recipes: Arc::new(PgRecipeRepository::new(pool.clone())),
            favorites: Arc::new(PgFavoriteRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
            jwt: Arc::new(JwtKeys::from_secret(&config.jwt.secret)),
            pagination: Arc::new(config.pagination.clone()),
        }
    }

    pub fn favorite_service(&self) -> FavoriteService {
        FavoriteService::new(self.recipes.clone(), self.favorites.clone())
    }

    pub fn recipe_service(&self) -> RecipeService {
        RecipeService::new(self.recipes.clone())
    }
}

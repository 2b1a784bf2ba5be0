/// Database access layer
///
/// Each repository is a trait so services and handlers can be exercised
/// against mocks; the `Pg*` structs are the sqlx implementations.
pub mod favorite_repo;
pub mod recipe_repo;
pub mod user_repo;

pub use favorite_repo::{FavoriteRepository, PgFavoriteRepository};
pub use recipe_repo::{PgRecipeRepository, RecipeRepository};
pub use user_repo::{PgUserRepository, UserRepository};

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    db_pool::run_migrations(pool, &MIGRATOR).await
}

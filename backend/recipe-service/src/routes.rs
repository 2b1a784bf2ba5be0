//! Route configuration
//!
//! Recipe reads accept anonymous callers; favorites and the user profile
//! always require a bearer token.

use crate::app_state::AppState;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::JwtAuthMiddleware;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .route("/metrics", web::get().to(handlers::metrics_handler))
    .route("/api/v1/health", web::get().to(handlers::health_check))
    .route("/api/v1/health/live", web::get().to(handlers::liveness_check))
    .service(
        web::scope("/api/v1/recipes")
            .wrap(JwtAuthMiddleware::optional(state.jwt.clone()))
            .route("", web::get().to(handlers::list_recipes))
            .route("", web::post().to(handlers::create_recipe))
            .route("/{recipe_id}", web::get().to(handlers::get_recipe))
            .route("/{recipe_id}", web::delete().to(handlers::delete_recipe))
            .route("/{recipe_id}/favorite", web::post().to(handlers::add_favorite))
            .route("/{recipe_id}/favorite", web::delete().to(handlers::remove_favorite)),
    )
    .service(
        web::scope("/api/v1/favorites")
            .wrap(JwtAuthMiddleware::required(state.jwt.clone()))
            .route("", web::get().to(handlers::list_favorites))
            .route("", web::post().to(handlers::create_favorite)),
    )
    .service(
        web::scope("/api/v1/users")
            .wrap(JwtAuthMiddleware::required(state.jwt.clone()))
            .route("/me", web::get().to(handlers::get_current_user)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::favorite_repo::MockFavoriteRepository;
    use crate::db::recipe_repo::MockRecipeRepository;
    use crate::db::user_repo::MockUserRepository;
    use crate::models::{Favorite, Recipe, RecipeShort, User};
    use crate::pagination::PaginationConfig;
    use crate::security::JwtKeys;
    use actix_web::{http::StatusCode, test, App};
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use std::sync::Arc;
    use uuid::Uuid;

    const SECRET: &str = "routes-test-secret-0123456789abcdefgh";

    fn state(
        recipes: MockRecipeRepository,
        favorites: MockFavoriteRepository,
        users: MockUserRepository,
    ) -> AppState {
        AppState {
            recipes: Arc::new(recipes),
            favorites: Arc::new(favorites),
            users: Arc::new(users),
            jwt: Arc::new(JwtKeys::from_secret(SECRET)),
            pagination: Arc::new(PaginationConfig::default()),
        }
    }

    fn bearer(user_id: Uuid) -> (&'static str, String) {
        let token = JwtKeys::from_secret(SECRET)
            .generate_access_token(user_id, Duration::minutes(5))
            .unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    fn recipe(id: Uuid) -> Recipe {
        Recipe {
            id,
            author_id: Uuid::new_v4(),
            name: "Pho".to_string(),
            text: "Simmer bones".to_string(),
            image: "recipes/images/pho.png".to_string(),
            cooking_time: 180,
            created_at: Utc::now(),
        }
    }

    fn short(name: &str) -> RecipeShort {
        RecipeShort {
            id: Uuid::new_v4(),
            name: name.to_string(),
            image: format!("{}.png", name),
            cooking_time: 10,
        }
    }

    macro_rules! init_app {
        ($state:expr) => {{
            let state = $state;
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state.clone()))
                    .configure(|cfg| configure_routes(cfg, &state)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_add_favorite_returns_short_recipe() {
        let user_id = Uuid::new_v4();
        let recipe_id = Uuid::new_v4();

        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(recipe(id))));
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_exists().returning(|_, _| Ok(false));
        favorites.expect_insert().returning(|u, r| {
            Ok(Some(Favorite {
                id: Uuid::new_v4(),
                user_id: u,
                recipe_id: r,
                created_at: Utc::now(),
            }))
        });

        let app = init_app!(state(recipes, favorites, MockUserRepository::new()));

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{}/favorite", recipe_id))
            .insert_header(bearer(user_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            serde_json::json!({
                "id": recipe_id,
                "name": "Pho",
                "image": "recipes/images/pho.png",
                "cooking_time": 180,
            })
        );
    }

    #[actix_web::test]
    async fn test_duplicate_favorite_is_bad_request() {
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .returning(|id| Ok(Some(recipe(id))));
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_exists().returning(|_, _| Ok(true));

        let app = init_app!(state(recipes, favorites, MockUserRepository::new()));

        let req = test::TestRequest::post()
            .uri("/api/v1/favorites")
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(serde_json::json!({ "recipe": Uuid::new_v4() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "This recipe is already in favorites.");
    }

    #[actix_web::test]
    async fn test_favorite_for_another_user_is_forbidden() {
        let app = init_app!(state(
            MockRecipeRepository::new(),
            MockFavoriteRepository::new(),
            MockUserRepository::new()
        ));

        let req = test::TestRequest::post()
            .uri("/api/v1/favorites")
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(serde_json::json!({ "user": Uuid::new_v4(), "recipe": Uuid::new_v4() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_malformed_favorite_body_is_bad_request() {
        let app = init_app!(state(
            MockRecipeRepository::new(),
            MockFavoriteRepository::new(),
            MockUserRepository::new()
        ));

        let req = test::TestRequest::post()
            .uri("/api/v1/favorites")
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(serde_json::json!({ "recipe": "not-a-uuid" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_favorites_require_token() {
        let app = init_app!(state(
            MockRecipeRepository::new(),
            MockFavoriteRepository::new(),
            MockUserRepository::new()
        ));

        let req = test::TestRequest::get().uri("/api/v1/favorites").to_request();
        let resp = test::try_call_service(&app, req).await;
        let err = resp.err().expect("anonymous request should fail");
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        // Optional scope still needs a token for writes
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{}/favorite", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_list_favorites_links() {
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_count_for_user().returning(|_| Ok(3));
        favorites
            .expect_list_recipes_for_user()
            .withf(|_, limit, offset| *limit == 1 && *offset == 1)
            .returning(|_, _, _| Ok(vec![short("salad")]));

        let app = init_app!(state(
            MockRecipeRepository::new(),
            favorites,
            MockUserRepository::new()
        ));

        let req = test::TestRequest::get()
            .uri("/api/v1/favorites?page=2&limit=1")
            .insert_header(bearer(Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 3);
        assert_eq!(body["results"][0]["name"], "salad");
        assert!(body["next"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/favorites?limit=1&page=3"));
        assert!(body["previous"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/favorites?limit=1"));
    }

    #[actix_web::test]
    async fn test_custom_page_param_links_and_last_page() {
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_count_for_user().returning(|_| Ok(5));
        favorites
            .expect_list_recipes_for_user()
            .withf(|_, limit, offset| *limit == 2 && (*offset == 2 || *offset == 4))
            .returning(|_, _, _| Ok(vec![short("stew")]));

        let mut state = state(
            MockRecipeRepository::new(),
            favorites,
            MockUserRepository::new(),
        );
        state.pagination = Arc::new(PaginationConfig {
            page_query_param: "p".to_string(),
            ..PaginationConfig::default()
        });
        let app = init_app!(state);
        let user_id = Uuid::new_v4();

        let req = test::TestRequest::get()
            .uri("/api/v1/favorites?p=2&limit=2")
            .insert_header(bearer(user_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 5);
        assert!(body["next"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/favorites?limit=2&p=3"));
        assert!(body["previous"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/favorites?limit=2"));

        let req = test::TestRequest::get()
            .uri("/api/v1/favorites?p=last&limit=2")
            .insert_header(bearer(user_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["next"], Value::Null);
        assert!(body["previous"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/favorites?limit=2&p=2"));

        // The default name is not special once renamed
        let req = test::TestRequest::get()
            .uri("/api/v1/favorites?page=9&p=2&limit=2")
            .insert_header(bearer(user_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["next"]
            .as_str()
            .unwrap()
            .ends_with("/api/v1/favorites?limit=2&p=3&page=9"));
    }

    #[actix_web::test]
    async fn test_page_out_of_range_is_not_found() {
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_count_for_user().returning(|_| Ok(2));
        favorites.expect_list_recipes_for_user().never();

        let app = init_app!(state(
            MockRecipeRepository::new(),
            favorites,
            MockUserRepository::new()
        ));

        let req = test::TestRequest::get()
            .uri("/api/v1/favorites?page=9")
            .insert_header(bearer(Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("Invalid page."));
    }

    #[actix_web::test]
    async fn test_anonymous_recipe_list() {
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_count()
            .withf(|_, viewer| viewer.is_none())
            .returning(|_, _| Ok(0));
        recipes.expect_list().returning(|_, _, _, _| Ok(vec![]));

        let app = init_app!(state(
            recipes,
            MockFavoriteRepository::new(),
            MockUserRepository::new()
        ));

        let req = test::TestRequest::get().uri("/api/v1/recipes").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            serde_json::json!({"count": 0, "next": null, "previous": null, "results": []})
        );
    }

    #[actix_web::test]
    async fn test_current_user_profile() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                username: "cook".to_string(),
                email: "cook@example.com".to_string(),
                first_name: "Sam".to_string(),
                last_name: "Cook".to_string(),
                created_at: Utc::now(),
            }))
        });

        let app = init_app!(state(
            MockRecipeRepository::new(),
            MockFavoriteRepository::new(),
            users
        ));

        let req = test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(bearer(user_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], user_id.to_string());
        assert_eq!(body["username"], "cook");
    }
}

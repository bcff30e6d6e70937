pub mod config;
pub mod contributions;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod permissions;
pub mod query;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shabdakosh Dictionary API",
        version = "1.0.0",
        description = "API for a bilingual Nepali/English dictionary"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::word::search_words,
        handlers::word::suggestions,
        handlers::word::random_word,
        handlers::word::get_word,
        handlers::word::create_word,
        handlers::word::update_word,
        handlers::word::delete_word,
        handlers::bookmark::list_bookmarks,
        handlers::bookmark::add_bookmark,
        handlers::bookmark::remove_bookmark,
        handlers::bookmark::sync_bookmarks,
        handlers::user::get_profile,
        handlers::user::update_profile,
        handlers::user::list_users,
        handlers::user::update_role,
        handlers::user::stats,
    ),
    tags(
        (name = "Auth", description = "Registration, login, and token identity"),
        (name = "Words", description = "Dictionary entry search and CRUD"),
        (name = "Bookmarks", description = "Per-user saved entries"),
        (name = "Users", description = "Profiles, roles, and dashboard data"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = ApiDoc::openapi();
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
}

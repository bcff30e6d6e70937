use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/words", words_routes())
        .nest("/word", word_mutation_routes())
        .nest("/bookmarks", bookmark_routes())
        .nest("/users", user_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn words_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::word::search_words))
        .route("/suggestions", get(handlers::word::suggestions))
        .route("/random", get(handlers::word::random_word))
        .route("/{id}", get(handlers::word::get_word))
}

fn word_mutation_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(handlers::word::create_word))
        .route("/update", put(handlers::word::update_word))
        .route("/delete", delete(handlers::word::delete_word))
}

fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::bookmark::list_bookmarks))
        .route("/add", post(handlers::bookmark::add_bookmark))
        .route("/remove", post(handlers::bookmark::remove_bookmark))
        .route("/sync", post(handlers::bookmark::sync_bookmarks))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::user::list_users).patch(handlers::user::update_role),
        )
        .route(
            "/profile",
            get(handlers::user::get_profile).patch(handlers::user::update_profile),
        )
        .route("/stats", get(handlers::user::stats))
}

pub mod auth;
mod deliverables;
mod error;
mod guard;
mod projects;
mod quotes;
mod validation;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected API routes; every handler authenticates via the bearer-token
    // User extractor
    let api_routes = Router::new()
        // Account
        .route("/users/me", get(auth::me))
        .route("/users/me", patch(auth::update_me))
        // Projects
        .route("/projects", post(projects::create_project))
        .route("/projects/open", get(projects::list_open_projects))
        .route("/projects/me/client", get(projects::list_client_projects))
        .route("/projects/me/worker", get(projects::list_worker_projects))
        .route("/projects/:id", get(projects::get_project))
        .route("/projects/:id", patch(projects::update_project))
        .route("/projects/:id/assign", post(projects::assign_project))
        .route("/projects/:id/complete", post(projects::complete_project))
        .route("/projects/:id/reject", post(projects::reject_project))
        // Quotes
        .route("/projects/:id/quotes", post(quotes::create_quote))
        .route("/projects/:id/quotes", get(quotes::list_project_quotes))
        .route("/quotes/me", get(quotes::list_my_quotes))
        // Deliverables
        .route(
            "/projects/:id/deliverables",
            post(deliverables::create_deliverable),
        )
        .route(
            "/projects/:id/deliverables",
            get(deliverables::list_deliverables),
        )
        .route(
            "/projects/:id/deliverables/upload",
            post(deliverables::upload_deliverable),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

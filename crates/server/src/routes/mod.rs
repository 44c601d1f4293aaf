pub mod auth;
pub mod documentos;
pub mod indiciados;
pub mod invitations;
pub mod sectores;
pub mod subsectores;
pub mod users;
pub mod vehiculos;

use axum::routing::{delete, get, post, put};
use axum::{middleware, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use auth::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public surface, token-protected
/// record endpoints, and the admin-gated management group.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/invitations/validate/:code", get(invitations::validate))
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.clone()));

    let records = Router::new()
        .route("/auth/profile", get(auth::profile))
        .route("/sectores", get(sectores::list).post(sectores::create))
        .route(
            "/sectores/:id",
            get(sectores::get).put(sectores::rename).delete(sectores::remove),
        )
        .route("/subsectores", get(subsectores::list).post(subsectores::create))
        .route(
            "/subsectores/:id",
            get(subsectores::get).put(subsectores::rename).delete(subsectores::remove),
        )
        .route("/indiciados", get(indiciados::list).post(indiciados::create))
        .route("/indiciados/search", get(indiciados::search))
        .route(
            "/indiciados/:id",
            get(indiciados::get).put(indiciados::update).delete(indiciados::remove),
        )
        .route(
            "/documentos/indiciado/:id",
            get(documentos::list).post(documentos::upload),
        )
        .route("/documentos/:id", delete(documentos::remove))
        .route("/vehiculos", get(vehiculos::list).post(vehiculos::create))
        .route(
            "/vehiculos/:id",
            get(vehiculos::get).put(vehiculos::update).delete(vehiculos::remove),
        );

    // Admin group; the inner gate runs after the outer bearer middleware
    let admin = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/stats", get(users::stats))
        .route("/users/:id", get(users::get).put(users::update).delete(users::remove))
        .route("/users/:id/toggle-status", put(users::toggle_status))
        .route("/invitations", get(invitations::list))
        .route("/invitations/send", post(invitations::send))
        .route("/invitations/resend/:id", post(invitations::resend))
        .route("/invitations/:id", delete(invitations::revoke))
        .route_layer(middleware::from_fn(auth::require_admin));

    public
        .merge(records)
        .merge(admin)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

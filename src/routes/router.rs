/**
 * Router Configuration
 *
 * One generic content router serves all four content kinds; each mount
 * carries its `ContentKind` as an extension so the shared handlers know
 * which kind they are working on.
 *
 * # Route Layout
 *
 * - `/news`, `/actions`, `/services`, `/projects` - content CRUD,
 *   search, top-views, featured
 * - `/category` - category management
 * - `/documents` - documents with attachments
 * - `/account` - login and account management
 * - `/realtime` - SSE event subscription
 * - `/files` - uploaded files served from disk
 * - `/health` - liveness check
 *
 * Reads are public; writes go through the auth middleware.
 */

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::auth::handlers::{add_account, login, me};
use crate::category::handlers::{
    add_category, delete_category, get_categories, get_categories_by_type, update_category,
};
use crate::content::handlers::{
    add_content, delete_content, get_content, get_content_by_id, get_featured, get_top_views,
    search_content, update_content,
};
use crate::content::model::ContentKind;
use crate::documents::handlers::{
    add_document, delete_document, get_document_by_id, get_documents, update_document,
};
use crate::middleware::auth::auth_middleware;
use crate::realtime::subscription::handle_realtime_subscription;
use crate::response::Envelope;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .nest("/news", content_routes(&app_state, ContentKind::News))
        .nest("/actions", content_routes(&app_state, ContentKind::Action))
        .nest("/services", content_routes(&app_state, ContentKind::Service))
        .nest("/projects", content_routes(&app_state, ContentKind::Project))
        .nest("/category", category_routes(&app_state))
        .nest("/documents", document_routes(&app_state))
        .nest("/account", account_routes(&app_state))
        .route("/realtime", get(handle_realtime_subscription))
        .route("/health", get(health))
        .nest_service("/files", ServeDir::new(&app_state.upload_dir))
        .layer(CorsLayer::permissive());

    router.with_state(app_state)
}

/// Routes shared by every content kind. Literal segments are registered
/// alongside `/{id}` — Axum gives literals priority.
fn content_routes(app_state: &AppState, kind: ContentKind) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(add_content))
        .route("/{id}", put(update_content).delete(delete_content))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .route("/", get(get_content))
        .route("/search", get(search_content))
        .route("/top-views", get(get_top_views))
        .route("/featured", get(get_featured))
        .route("/{id}", get(get_content_by_id))
        .merge(protected)
        .layer(Extension(kind))
}

fn category_routes(app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(add_category))
        .route("/{id}", put(update_category).delete(delete_category))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .route("/", get(get_categories))
        .route("/type/{type}", get(get_categories_by_type))
        .merge(protected)
}

fn document_routes(app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(add_document))
        .route("/{id}", put(update_document).delete(delete_document))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .route("/", get(get_documents))
        .route("/{id}", get(get_document_by_id))
        .merge(protected)
}

fn account_routes(app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(add_account))
        .route("/me", get(me))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new().route("/login", post(login)).merge(protected)
}

async fn health() -> Json<Envelope<&'static str>> {
    Envelope::ok("ok", "Service healthy")
}

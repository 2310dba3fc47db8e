//! Route definitions for the `/applications` resource.
//!
//! Conditions and releases are nested under `/applications/{app_id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{application, condition, release};
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// GET    /                                        -> list
/// POST   /                                        -> create
/// GET    /{id}                                    -> get_by_id
/// PUT    /{id}                                    -> update
/// DELETE /{id}                                    -> delete
///
/// GET    /{app_id}/conditions                     -> list_by_application
/// POST   /{app_id}/conditions                     -> create
/// GET    /{app_id}/conditions/{id}                -> get_by_id
/// PUT    /{app_id}/conditions/{id}                -> update
/// DELETE /{app_id}/conditions/{id}                -> delete
///
/// GET    /{app_id}/releases                       -> list_by_application
/// POST   /{app_id}/releases                       -> create
/// POST   /{app_id}/releases/latest                -> latest
/// GET    /{app_id}/releases/{id}                  -> get_by_id
/// PUT    /{app_id}/releases/{id}                  -> update
/// DELETE /{app_id}/releases/{id}                  -> delete
/// POST   /{app_id}/releases/{id}/availability     -> availability
/// ```
pub fn router() -> Router<AppState> {
    let condition_routes = Router::new()
        .route(
            "/",
            get(condition::list_by_application).post(condition::create),
        )
        .route(
            "/{id}",
            get(condition::get_by_id)
                .put(condition::update)
                .delete(condition::delete),
        );

    let release_routes = Router::new()
        .route("/", get(release::list_by_application).post(release::create))
        .route("/latest", post(release::latest))
        .route(
            "/{id}",
            get(release::get_by_id)
                .put(release::update)
                .delete(release::delete),
        )
        .route("/{id}/availability", post(release::availability));

    Router::new()
        .route("/", get(application::list).post(application::create))
        .route(
            "/{app_id}",
            get(application::get_by_id)
                .put(application::update)
                .delete(application::delete),
        )
        .nest("/{app_id}/conditions", condition_routes)
        .nest("/{app_id}/releases", release_routes)
}

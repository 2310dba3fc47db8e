pub mod activity;
pub mod application;
pub mod health;
pub mod updates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /updates/check                                       public update check (POST)
///
/// /applications                                        list, create
/// /applications/{app_id}                               get, update, delete
/// /applications/{app_id}/conditions                    list, create
/// /applications/{app_id}/conditions/{id}               get, update, delete
/// /applications/{app_id}/releases                      list (?status=), create
/// /applications/{app_id}/releases/latest               select latest for a context (POST)
/// /applications/{app_id}/releases/{id}                 get, update, delete
/// /applications/{app_id}/releases/{id}/availability    single-release check (POST)
///
/// /activity                                            recent activity (?app_id=&limit=&offset=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/updates", updates::router())
        .nest("/applications", application::router())
        .nest("/activity", activity::router())
}

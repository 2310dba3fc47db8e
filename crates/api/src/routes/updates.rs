use axum::routing::post;
use axum::Router;

use crate::handlers::update_check;
use crate::state::AppState;

/// Routes mounted at `/updates`.
///
/// ```text
/// POST   /check                                   -> check
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/check", post(update_check::check))
}

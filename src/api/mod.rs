use axum::{middleware, Router};
use camino::Utf8Path as Path;
use tower_http::services::ServeDir;

use crate::app_state::SharedState;

pub mod auth_gate;
pub mod routes;
pub mod schema;

/// The full app surface with the session gate in front of it. The fallback
/// serving static pages sits inside the gate so page routes like /dashboard
/// get the same redirect treatment as in the original policy.
pub fn app_router(shared_state: SharedState, static_dir: &Path) -> Router {
    Router::new()
        .nest("/api/image", routes::image::router())
        .nest("/api/video", routes::video::router())
        .nest("/api/auth", routes::auth::router())
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            auth_gate::session_gate,
        ))
        .with_state(shared_state)
}

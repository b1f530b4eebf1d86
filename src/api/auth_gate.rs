use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    app_state::SharedState,
    auth::{token_from_headers, verify_session_token},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectHome,
    RedirectLogin,
}

/// Request routing policy, first match wins. This only decides where a
/// request goes based on path shape and session presence, per-resource
/// authorization stays with the handlers.
pub fn route_decision(authenticated: bool, path: &str) -> RouteDecision {
    if authenticated && (path == "/login" || path == "/register") {
        return RouteDecision::RedirectHome;
    }
    if path == "/" || path.starts_with("/api/auth") || path == "/login" || path == "/register" {
        return RouteDecision::Allow;
    }
    if !authenticated && path.starts_with("/dashboard") {
        return RouteDecision::RedirectLogin;
    }
    // The "/" arm is unreachable (already admitted above). The original
    // policy had the same redundancy, it stays to keep the rule order
    // recognizable.
    if !authenticated && (path == "/" || path.starts_with("/api/videos")) {
        return RouteDecision::RedirectLogin;
    }
    RouteDecision::Allow
}

pub async fn session_gate(
    State(app_state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let authenticated = token_from_headers(request.headers())
        .map(|token| verify_session_token(&token, &app_state.config.auth.session_secret).is_some())
        .unwrap_or(false);
    match route_decision(authenticated, request.uri().path()) {
        RouteDecision::Allow => next.run(request).await,
        RouteDecision::RedirectHome => Redirect::to("/").into_response(),
        RouteDecision::RedirectLogin => Redirect::to("/login").into_response(),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{route_decision, RouteDecision::*};

    #[test]
    fn authenticated_login_and_register_redirect_home() {
        assert_eq!(route_decision(true, "/login"), RedirectHome);
        assert_eq!(route_decision(true, "/register"), RedirectHome);
    }

    #[test]
    fn public_paths_are_allowed_for_everyone() {
        for path in ["/", "/login", "/register", "/api/auth/login"] {
            assert_eq!(route_decision(false, path), Allow, "path {}", path);
        }
        assert_eq!(route_decision(true, "/"), Allow);
        assert_eq!(route_decision(true, "/api/auth/imagekit-auth"), Allow);
    }

    #[test]
    fn anonymous_dashboard_redirects_to_login() {
        assert_eq!(route_decision(false, "/dashboard"), RedirectLogin);
        assert_eq!(route_decision(false, "/dashboard/images"), RedirectLogin);
        assert_eq!(route_decision(true, "/dashboard"), Allow);
    }

    #[test]
    fn anonymous_video_listing_pages_redirect_to_login() {
        assert_eq!(route_decision(false, "/api/videos"), RedirectLogin);
        assert_eq!(route_decision(false, "/api/videos/recent"), RedirectLogin);
        assert_eq!(route_decision(true, "/api/videos"), Allow);
    }

    #[test]
    fn everything_else_is_allowed() {
        assert_eq!(route_decision(false, "/api/image"), Allow);
        assert_eq!(route_decision(false, "/api/video"), Allow);
        assert_eq!(route_decision(true, "/anything"), Allow);
    }
}

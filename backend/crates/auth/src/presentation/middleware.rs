//! Auth Middleware
//!
//! Session and CSRF guards for protected routes. Attach with
//! `axum::middleware::from_fn_with_state`; `require_admin` needs no state and
//! must run after `require_access_token`.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::csrf::CsrfGuard;
use crate::application::token_issuer::{TokenClass, TokenIssuer};
use crate::domain::entity::auth_context::AuthContext;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub issuer: Arc<TokenIssuer>,
    pub csrf: Arc<CsrfGuard>,
    pub config: Arc<AuthConfig>,
}

impl AuthMiddlewareState {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            issuer: Arc::new(TokenIssuer::new(&config)),
            csrf: Arc::new(CsrfGuard::new(config.csrf_secret)),
            config,
        }
    }
}

/// `Authorization: Bearer <token>`; any other scheme counts as absent
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Require a valid access token and attach the caller's `AuthContext`
pub async fn require_access_token(
    State(state): State<AuthMiddlewareState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::NoToken)?;
    let claims = state.issuer.verify(token, TokenClass::Access)?;

    req.extensions_mut().insert(AuthContext::from(claims));

    Ok(next.run(req).await)
}

/// Require a valid CSRF token on state-changing methods
pub async fn require_csrf(
    State(state): State<AuthMiddlewareState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if is_safe_method(req.method()) {
        return Ok(next.run(req).await);
    }
    check_csrf(&state, req.headers())?;
    Ok(next.run(req).await)
}

/// Require a valid CSRF token regardless of method (refresh is a GET)
pub async fn require_csrf_strict(
    State(state): State<AuthMiddlewareState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    check_csrf(&state, req.headers())?;
    Ok(next.run(req).await)
}

/// Require the admin role on an already authenticated request
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AuthError::NoToken)?;

    if !ctx.is_admin() {
        tracing::warn!(user_id = %ctx.user_id(), "Non-admin attempted an admin route");
        return Err(AuthError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn check_csrf(state: &AuthMiddlewareState, headers: &HeaderMap) -> Result<(), AuthError> {
    let secret = platform::cookie::extract_cookie(headers, &state.config.csrf_cookie_name);
    let token = headers
        .get(state.config.csrf_header_name.as_str())
        .and_then(|v| v.to_str().ok());

    state.csrf.verify(secret.as_deref(), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_safe_methods() {
        assert!(is_safe_method(&Method::GET));
        assert!(is_safe_method(&Method::HEAD));
        assert!(is_safe_method(&Method::OPTIONS));
        assert!(!is_safe_method(&Method::POST));
        assert!(!is_safe_method(&Method::PUT));
        assert!(!is_safe_method(&Method::PATCH));
        assert!(!is_safe_method(&Method::DELETE));
    }
}

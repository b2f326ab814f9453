//! Auth Router

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use crate::domain::repository::{AuthoredContentRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AdminAppState, AuthAppState};
use crate::presentation::middleware::{
    AuthMiddlewareState, require_access_token, require_admin, require_csrf, require_csrf_strict,
};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, middleware: AuthMiddlewareState) -> Router {
    auth_router_generic(repo, middleware)
}

/// Create a generic Auth router for any repository implementation
///
/// Register and login are open; refresh and logout carry the CSRF check;
/// `/me` needs a bearer token.
pub fn auth_router_generic<R>(repo: R, middleware: AuthMiddlewareState) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, &middleware);

    let public = Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>));

    let cookie_bound = Router::new()
        .route("/refresh", get(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route_layer(from_fn_with_state(middleware.clone(), require_csrf_strict));

    let authenticated = Router::new()
        .route("/me", get(handlers::me::<R>))
        .route_layer(from_fn_with_state(middleware, require_access_token));

    public
        .merge(cookie_bound)
        .merge(authenticated)
        .with_state(state)
}

/// `GET /csrf-token`
pub fn csrf_router(middleware: AuthMiddlewareState) -> Router {
    Router::new()
        .route("/csrf-token", get(handlers::csrf_token))
        .with_state(middleware)
}

/// Create the Admin router with PostgreSQL user repository
pub fn admin_router<C>(
    repo: PgAuthRepository,
    content: C,
    middleware: AuthMiddlewareState,
) -> Router
where
    C: AuthoredContentRepository + Clone + Send + Sync + 'static,
{
    admin_router_generic(repo, content, middleware)
}

/// Admin routes: bearer token, then admin role, then CSRF on mutations
pub fn admin_router_generic<R, C>(repo: R, content: C, middleware: AuthMiddlewareState) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: AuthoredContentRepository + Clone + Send + Sync + 'static,
{
    let state = AdminAppState {
        repo: Arc::new(repo),
        content: Arc::new(content),
    };

    // route_layer wraps outward: the last layer added runs first
    Router::new()
        .route("/users", get(handlers::list_users::<R, C>))
        .route("/users/{id}", delete(handlers::delete_user::<R, C>))
        .route("/users/{id}/ban", patch(handlers::ban_user::<R, C>))
        .route("/users/{id}/unban", patch(handlers::unban_user::<R, C>))
        .route_layer(from_fn_with_state(middleware.clone(), require_csrf))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(middleware, require_access_token))
        .with_state(state)
}

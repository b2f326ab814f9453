//! Blog Router

use auth::middleware::{AuthMiddlewareState, require_access_token, require_csrf};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::application::config::BlogConfig;
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::infra::postgres::PgBlogRepository;
use crate::presentation::handlers::{self, BlogAppState};

/// Create the Blog router with PostgreSQL repository
pub fn blog_router(
    repo: PgBlogRepository,
    config: BlogConfig,
    middleware: AuthMiddlewareState,
) -> Router {
    blog_router_generic(repo, config, middleware)
}

/// Create a generic Blog router for any repository implementation
///
/// Reads are public except `/posts/mine`; writes need a bearer token and a
/// CSRF token.
pub fn blog_router_generic<R>(
    repo: R,
    config: BlogConfig,
    middleware: AuthMiddlewareState,
) -> Router
where
    R: PostRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let state = BlogAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    let public = Router::new()
        .route("/posts", get(handlers::list_posts::<R>))
        .route("/posts/{id}", get(handlers::get_post::<R>))
        .route("/comments/{post_id}", get(handlers::list_comments::<R>));

    // route_layer wraps outward: the bearer check runs before CSRF
    let protected = Router::new()
        .route("/posts", post(handlers::create_post::<R>))
        .route("/posts/mine", get(handlers::list_my_posts::<R>))
        .route(
            "/posts/{id}",
            put(handlers::update_post::<R>).delete(handlers::delete_post::<R>),
        )
        .route("/posts/{id}/like", post(handlers::toggle_like::<R>))
        .route("/comments/{post_id}", post(handlers::add_comment::<R>))
        .route(
            "/comments/item/{comment_id}",
            delete(handlers::delete_comment::<R>),
        )
        .route_layer(from_fn_with_state(middleware.clone(), require_csrf))
        .route_layer(from_fn_with_state(middleware, require_access_token));

    public.merge(protected).with_state(state)
}

//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::{AdminAppState, AuthAppState};
pub use middleware::{
    AuthMiddlewareState, bearer_token, require_access_token, require_admin, require_csrf,
    require_csrf_strict,
};
pub use router::{admin_router, admin_router_generic, auth_router, auth_router_generic, csrf_router};

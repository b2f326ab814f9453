//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::application::{AdminSeed, ensure_admin};
use auth::{AuthConfig, AuthMiddlewareState, PgAuthRepository, admin_router, auth_router, csrf_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use blog::{BlogConfig, PgBlogRepository, blog_router};
use platform::password::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,blog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Auth configuration; release builds refuse to start without real secrets
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::from_env_or_development()?
    } else {
        AuthConfig::from_env()?
    };
    let middleware = AuthMiddlewareState::new(Arc::new(auth_config));

    // Database connection
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let user_repo = PgAuthRepository::new(pool.clone());
    let blog_repo = PgBlogRepository::new(pool.clone());

    // Seed admin; a bad seed should not prevent server startup
    if let Some(seed) = AdminSeed::from_env() {
        let hasher = Arc::new(PasswordHasher::new(
            middleware.config.pepper().map(<[u8]>::to_vec),
        ));
        if let Err(e) = ensure_admin(&user_repo, &hasher, seed).await {
            tracing::warn!(error = %e, "Seed admin failed, continuing anyway");
        }
    }

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = cors_layer(allowed_origins, &middleware.config.csrf_header_name)?;

    // Build router
    let api = Router::new()
        .nest("/auth", auth_router(user_repo.clone(), middleware.clone()))
        .nest(
            "/admin",
            admin_router(user_repo, blog_repo.clone(), middleware.clone()),
        )
        .merge(csrf_router(middleware.clone()))
        .merge(blog_router(blog_repo, BlogConfig::default(), middleware));

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Credentialed CORS for the frontend origins; the CSRF header comes from
/// auth config so a renamed header keeps passing preflight
fn cors_layer(
    allowed_origins: Vec<http::HeaderValue>,
    csrf_header_name: &str,
) -> anyhow::Result<CorsLayer> {
    let csrf_header = http::HeaderName::try_from(csrf_header_name)?;

    Ok(CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            csrf_header,
        ]))
        .allow_credentials(true))
}

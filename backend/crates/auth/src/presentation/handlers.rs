//! HTTP Handlers

use axum::Extension;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::extract::Json;
use platform::cookie::CookieConfig;
use platform::password::PasswordHasher;
use std::str::FromStr;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_issuer::{TokenIssuer, TokenPair};
use crate::application::{
    AdminUsersUseCase, CurrentUserUseCase, RefreshUseCase, SignInInput, SignInUseCase,
    SignUpInput, SignUpUseCase,
};
use crate::domain::entity::auth_context::AuthContext;
use crate::domain::repository::{AuthoredContentRepository, UserRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, CsrfTokenResponse, DeleteUserResponse, LoginRequest, MessageResponse,
    RegisterRequest, UserEnvelope, UserResponse,
};
use crate::presentation::middleware::AuthMiddlewareState;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub issuer: Arc<TokenIssuer>,
    pub hasher: Arc<PasswordHasher>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    /// Share the middleware's issuer and config so both sides agree on keys
    pub fn new(repo: R, middleware: &AuthMiddlewareState) -> Self {
        let hasher = PasswordHasher::new(middleware.config.pepper().map(<[u8]>::to_vec));
        Self {
            repo: Arc::new(repo),
            config: Arc::clone(&middleware.config),
            issuer: Arc::clone(&middleware.issuer),
            hasher: Arc::new(hasher),
        }
    }
}

/// Shared state for admin handlers
#[derive(Clone)]
pub struct AdminAppState<R, C>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: AuthoredContentRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub content: Arc<C>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.issuer.clone(),
    );

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let pair = use_case.execute(input).await?;

    session_response(StatusCode::CREATED, &state.config, pair)
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.issuer.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let pair = use_case.execute(input).await?;

    session_response(StatusCode::OK, &state.config, pair)
}

// ============================================================================
// Refresh / Logout
// ============================================================================

/// GET /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name);

    let pair = RefreshUseCase::new(state.repo.clone(), state.issuer.clone())
        .execute(token.as_deref())
        .await?;

    session_response(StatusCode::OK, &state.config, pair)
}

/// POST /api/auth/logout
///
/// Stateless: only the cookie is cleared.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let cookie = state
        .config
        .refresh_cookie()
        .delete_cookie_header()
        .map_err(|e| AuthError::Internal(format!("Invalid cookie header: {e}")))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out")),
    ))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(&ctx)
        .await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

// ============================================================================
// CSRF
// ============================================================================

/// GET /api/csrf-token
///
/// Reuses the existing cookie secret so tokens held by other tabs stay valid.
pub async fn csrf_token(
    State(state): State<AuthMiddlewareState>,
    headers: HeaderMap,
) -> AuthResult<Response> {
    let secret = platform::cookie::extract_cookie(&headers, &state.config.csrf_cookie_name)
        .unwrap_or_else(|| state.csrf.generate_secret());

    let token = state.csrf.issue(&secret);
    let cookie = set_cookie(&state.config.csrf_cookie(), &secret)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(CsrfTokenResponse { csrf_token: token }),
    )
        .into_response())
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/users
pub async fn list_users<R, C>(
    State(state): State<AdminAppState<R, C>>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: AuthoredContentRepository + Clone + Send + Sync + 'static,
{
    let users = AdminUsersUseCase::new(state.repo.clone(), state.content.clone())
        .list()
        .await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user<R, C>(
    State(state): State<AdminAppState<R, C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> AuthResult<Json<DeleteUserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: AuthoredContentRepository + Clone + Send + Sync + 'static,
{
    let target_id = parse_user_id(&id)?;

    let audit = AdminUsersUseCase::new(state.repo.clone(), state.content.clone())
        .delete(&ctx, &target_id)
        .await?;

    Ok(Json(DeleteUserResponse::from(audit.counts)))
}

/// PATCH /api/admin/users/{id}/ban
pub async fn ban_user<R, C>(
    State(state): State<AdminAppState<R, C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: AuthoredContentRepository + Clone + Send + Sync + 'static,
{
    let target_id = parse_user_id(&id)?;

    let user = AdminUsersUseCase::new(state.repo.clone(), state.content.clone())
        .ban(&ctx, &target_id)
        .await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

/// PATCH /api/admin/users/{id}/unban
pub async fn unban_user<R, C>(
    State(state): State<AdminAppState<R, C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: AuthoredContentRepository + Clone + Send + Sync + 'static,
{
    let target_id = parse_user_id(&id)?;

    let user = AdminUsersUseCase::new(state.repo.clone(), state.content.clone())
        .unban(&ctx, &target_id)
        .await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    UserId::from_str(raw).map_err(|_| AuthError::validation("id", "Invalid user id"))
}

fn set_cookie(cookie: &CookieConfig, value: &str) -> AuthResult<HeaderValue> {
    cookie
        .set_cookie_header(value)
        .map_err(|e| AuthError::Internal(format!("Invalid cookie header: {e}")))
}

/// Access token in the body, refresh token in its cookie
fn session_response(
    status: StatusCode,
    config: &AuthConfig,
    pair: TokenPair,
) -> AuthResult<Response> {
    let mut refresh_cookie = config.refresh_cookie();
    refresh_cookie.max_age_secs = Some(pair.refresh_max_age_secs);
    let cookie = set_cookie(&refresh_cookie, &pair.refresh_token)?;

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: pair.access_token,
        }),
    )
        .into_response())
}

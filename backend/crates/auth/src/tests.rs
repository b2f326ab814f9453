//! Router-level tests for the auth crate
//! Drives the real routers over the in-memory store.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::{Arc, OnceLock};

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::{claims::Claims, user::User};
    use crate::domain::repository::{AuthoredContentRepository, CascadeCounts, UserRepository};
    use crate::domain::value_object::{
        display_name::DisplayName, email::Email, user_id::UserId, user_role::UserRole,
    };
    use crate::error::{AuthError, AuthResult};
    use crate::infra::memory::MemoryAuthRepository;
    use crate::presentation::middleware::AuthMiddlewareState;
    use crate::presentation::router::{admin_router_generic, auth_router_generic, csrf_router};

    pub const PASSWORD: &str = "Correct-Horse-42!";

    /// Content store stand-in that reports preset counts
    #[derive(Clone, Default)]
    pub struct FakeContent {
        pub counts: Arc<Mutex<HashMap<UserId, CascadeCounts>>>,
        pub calls: Arc<Mutex<Vec<UserId>>>,
        pub fail: bool,
    }

    impl FakeContent {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub async fn set(&self, author: UserId, counts: CascadeCounts) {
            self.counts.lock().await.insert(author, counts);
        }
    }

    impl AuthoredContentRepository for FakeContent {
        async fn delete_authored_by(&self, author_id: &UserId) -> AuthResult<CascadeCounts> {
            self.calls.lock().await.push(*author_id);
            if self.fail {
                return Err(AuthError::Internal("content store unavailable".to_string()));
            }
            Ok(self
                .counts
                .lock()
                .await
                .remove(author_id)
                .unwrap_or_default())
        }
    }

    pub struct TestApp {
        pub router: Router,
        pub repo: MemoryAuthRepository,
        pub content: FakeContent,
        pub middleware: AuthMiddlewareState,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self::with_content(FakeContent::default())
        }

        pub fn with_content(content: FakeContent) -> Self {
            let repo = MemoryAuthRepository::new();
            let middleware = AuthMiddlewareState::new(Arc::new(AuthConfig::with_random_secret()));

            let api = Router::new()
                .nest("/auth", auth_router_generic(repo.clone(), middleware.clone()))
                .nest(
                    "/admin",
                    admin_router_generic(repo.clone(), content.clone(), middleware.clone()),
                )
                .merge(csrf_router(middleware.clone()));

            Self {
                router: Router::new().nest("/api", api),
                repo,
                content,
                middleware,
            }
        }

        pub async fn send(&self, req: Request<Body>) -> Response<Body> {
            self.router.clone().oneshot(req).await.unwrap()
        }

        /// Seed a user directly in the store
        pub async fn seed(&self, email: &str, role: UserRole) -> User {
            let user = User::new(
                DisplayName::new("Seeded").unwrap(),
                Email::new(email).unwrap(),
                password_hash(),
            )
            .with_role(role);
            self.repo.create(&user).await.unwrap();
            user
        }

        pub fn access_token(&self, user: &User) -> String {
            self.middleware
                .issuer
                .issue_access_token(&Claims::for_user(user))
                .unwrap()
        }

        /// Fetch a CSRF token; returns (cookie secret, header token)
        pub async fn csrf(&self) -> (String, String) {
            let resp = self.send(get("/api/csrf-token").body(Body::empty()).unwrap()).await;
            assert_eq!(resp.status(), 200);
            let secret = set_cookie(&resp, "csrf_secret").unwrap();
            let body = json_body(resp).await;
            (secret, body["csrfToken"].as_str().unwrap().to_string())
        }
    }

    /// Argon2 is slow in debug builds; hash the shared test password once
    pub fn password_hash() -> HashedPassword {
        static HASH: OnceLock<HashedPassword> = OnceLock::new();
        HASH.get_or_init(|| {
            let password = ClearTextPassword::new(PASSWORD.to_string()).unwrap();
            PasswordHasher::default().hash(&password).unwrap()
        })
        .clone()
    }

    pub fn get(uri: &str) -> axum::http::request::Builder {
        Request::builder().method("GET").uri(uri)
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Value of the named cookie in the response's Set-Cookie headers
    pub fn set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
        raw_set_cookie(resp, name)?
            .split(';')
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(_, v)| v.to_string())
    }

    /// Full Set-Cookie header for the named cookie
    pub fn raw_set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
        resp.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{name}=")))
            .map(str::to_string)
    }

    pub async fn error_code(resp: Response<Body>) -> String {
        json_body(resp).await["code"].as_str().unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod session_tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::json;

    use super::support::*;
    use crate::application::token_issuer::TokenClass;
    use crate::domain::entity::claims::Claims;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::user_role::UserRole;

    #[tokio::test]
    async fn test_register_issues_session() {
        let app = TestApp::new();

        let resp = app
            .send(json_request(
                "POST",
                "/api/auth/register",
                json!({"name": "Ada", "email": "Ada@Example.com", "password": PASSWORD}),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let cookie = raw_set_cookie(&resp, "refresh_token").unwrap();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));

        let body = json_body(resp).await;
        let token = body["accessToken"].as_str().unwrap();
        let claims = app.middleware.issuer.verify(token, TokenClass::Access).unwrap();
        assert_eq!(claims.email.as_str(), "ada@example.com");
        assert_eq!(claims.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let app = TestApp::new();
        app.seed("taken@example.com", UserRole::User).await;

        let resp = app
            .send(json_request(
                "POST",
                "/api/auth/register",
                json!({"name": "Other", "email": "TAKEN@example.com", "password": PASSWORD}),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(resp).await, "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn test_register_missing_and_invalid_fields() {
        let app = TestApp::new();

        for body in [
            json!({"email": "a@example.com", "password": PASSWORD}),
            json!({"name": "A", "password": PASSWORD}),
            json!({"name": "A", "email": "a@example.com"}),
            json!({"name": "A", "email": "not-an-email", "password": PASSWORD}),
            json!({"name": "A", "email": "a@example.com", "password": "short"}),
        ] {
            let resp = app
                .send(json_request("POST", "/api/auth/register", body.clone()))
                .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(error_code(resp).await, "VALIDATION_ERROR", "{body}");
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_problem_details() {
        let app = TestApp::new();

        for (content_type, body, code) in [
            ("application/json", "{\"email\": ", "MALFORMED_JSON"),
            ("application/json", "{\"email\": 42}", "INVALID_BODY"),
            ("text/plain", "{}", "UNSUPPORTED_CONTENT_TYPE"),
        ] {
            let resp = app
                .send(
                    Request::builder()
                        .method("POST")
                        .uri("/api/auth/login")
                        .header(header::CONTENT_TYPE, content_type)
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
            let problem = json_body(resp).await;
            assert_eq!(problem["status"], 400);
            assert_eq!(problem["code"], code, "{body}");
        }
    }

    #[tokio::test]
    async fn test_login_claims_round_trip() {
        let app = TestApp::new();
        let admin = app.seed("root@example.com", UserRole::Admin).await;

        let resp = app
            .send(json_request(
                "POST",
                "/api/auth/login",
                json!({"email": "root@example.com", "password": PASSWORD}),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(set_cookie(&resp, "refresh_token").is_some());

        let body = json_body(resp).await;
        let claims = app
            .middleware
            .issuer
            .verify(body["accessToken"].as_str().unwrap(), TokenClass::Access)
            .unwrap();
        assert_eq!(claims, Claims::for_user(&admin));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials_uniformly() {
        let app = TestApp::new();
        app.seed("reader@example.com", UserRole::User).await;

        for body in [
            json!({"email": "reader@example.com", "password": "Wrong-Horse-42!"}),
            json!({"email": "nobody@example.com", "password": PASSWORD}),
            json!({"email": "reader@example.com"}),
        ] {
            let resp = app
                .send(json_request("POST", "/api/auth/login", body.clone()))
                .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(error_code(resp).await, "INVALID_CREDENTIALS", "{body}");
        }
    }

    #[tokio::test]
    async fn test_banned_user_cannot_login() {
        let app = TestApp::new();
        let mut user = app.seed("banned@example.com", UserRole::User).await;
        user.ban(crate::domain::value_object::user_id::UserId::new());
        crate::domain::repository::UserRepository::update(&app.repo, &user)
            .await
            .unwrap();

        let resp = app
            .send(json_request(
                "POST",
                "/api/auth/login",
                json!({"email": "banned@example.com", "password": PASSWORD}),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_code(resp).await, "ACCOUNT_DISABLED");
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let app = TestApp::new();
        let (secret, token) = app.csrf().await;

        let resp = app
            .send(
                get("/api/auth/refresh")
                    .header(header::COOKIE, format!("csrf_secret={secret}"))
                    .header("x-csrf-token", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(resp).await, "NO_REFRESH_TOKEN");
    }

    fn refresh_request(secret: &str, csrf: &str, refresh: &str) -> Request<Body> {
        get("/api/auth/refresh")
            .header(
                header::COOKIE,
                format!("csrf_secret={secret}; refresh_token={refresh}"),
            )
            .header("x-csrf-token", csrf)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_tampered_token() {
        let app = TestApp::new();
        let user = app.seed("t@example.com", UserRole::User).await;
        let refresh = app
            .middleware
            .issuer
            .issue_refresh_token(&Claims::for_user(&user))
            .unwrap();
        let tampered = format!("{refresh}x");
        let (secret, csrf) = app.csrf().await;

        let resp = app.send(refresh_request(&secret, &csrf, &tampered)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(resp).await, "MALFORMED_TOKEN");

        // An access token is not a refresh token
        let access = app.access_token(&user);
        let resp = app.send(refresh_request(&secret, &csrf, &access)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(resp).await, "MALFORMED_TOKEN");
    }

    #[tokio::test]
    async fn test_refresh_expired_token() {
        let app = TestApp::new();
        let user = app.seed("old@example.com", UserRole::User).await;
        let issued = chrono::Utc::now().timestamp()
            - app.middleware.config.refresh_token_ttl_secs()
            - 1;
        let refresh = app
            .middleware
            .issuer
            .issue_at(&Claims::for_user(&user), TokenClass::Refresh, issued)
            .unwrap();
        let (secret, csrf) = app.csrf().await;

        let resp = app.send(refresh_request(&secret, &csrf, &refresh)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(resp).await, "REFRESH_EXPIRED");
    }

    #[tokio::test]
    async fn test_refresh_rotates_cookie() {
        let app = TestApp::new();
        let user = app.seed("live@example.com", UserRole::User).await;
        let claims = Claims::for_user(&user);
        let issued = chrono::Utc::now().timestamp() - 60;
        let refresh = app
            .middleware
            .issuer
            .issue_at(&claims, TokenClass::Refresh, issued)
            .unwrap();
        let (secret, csrf) = app.csrf().await;

        let resp = app.send(refresh_request(&secret, &csrf, &refresh)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let rotated = set_cookie(&resp, "refresh_token").unwrap();
        assert_ne!(rotated, refresh);
        assert_eq!(
            app.middleware
                .issuer
                .verify(&rotated, TokenClass::Refresh)
                .unwrap(),
            claims
        );

        let body = json_body(resp).await;
        let access = app
            .middleware
            .issuer
            .verify(body["accessToken"].as_str().unwrap(), TokenClass::Access)
            .unwrap();
        assert_eq!(access, claims);
    }

    #[tokio::test]
    async fn test_refresh_keeps_login_deadline() {
        let app = TestApp::new();
        let user = app.seed("weekly@example.com", UserRole::User).await;
        let ttl = app.middleware.config.refresh_token_ttl_secs();
        let signed_in = chrono::Utc::now().timestamp() - 6 * 24 * 3600;
        let refresh = app
            .middleware
            .issuer
            .issue_at(&Claims::for_user(&user), TokenClass::Refresh, signed_in)
            .unwrap();
        let (secret, csrf) = app.csrf().await;

        let resp = app.send(refresh_request(&secret, &csrf, &refresh)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let header = raw_set_cookie(&resp, "refresh_token").unwrap();
        let max_age: i64 = header
            .split("; ")
            .find_map(|attr| attr.strip_prefix("Max-Age="))
            .unwrap()
            .parse()
            .unwrap();
        assert!(max_age <= 24 * 3600, "cookie outlives the session: {max_age}");

        let rotated = set_cookie(&resp, "refresh_token").unwrap();
        let session = app.middleware.issuer.verify_refresh(&rotated).unwrap();
        assert_eq!(session.expires_at, signed_in + ttl);
    }

    #[tokio::test]
    async fn test_refresh_rejects_banned_user() {
        let app = TestApp::new();
        let admin = app.seed("mod@example.com", UserRole::Admin).await;
        let mut user = app.seed("troll@example.com", UserRole::User).await;
        let refresh = app
            .middleware
            .issuer
            .issue_refresh_token(&Claims::for_user(&user))
            .unwrap();

        user.ban(admin.user_id);
        app.repo.update(&user).await.unwrap();

        let (secret, csrf) = app.csrf().await;
        let resp = app.send(refresh_request(&secret, &csrf, &refresh)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(set_cookie(&resp, "refresh_token").is_none());
        assert_eq!(error_code(resp).await, "ACCOUNT_DISABLED");
    }

    #[tokio::test]
    async fn test_refresh_rejects_deleted_user() {
        let app = TestApp::new();
        let user = app.seed("gone@example.com", UserRole::User).await;
        let refresh = app
            .middleware
            .issuer
            .issue_refresh_token(&Claims::for_user(&user))
            .unwrap();
        app.repo.delete(&user.user_id).await.unwrap();

        let (secret, csrf) = app.csrf().await;
        let resp = app.send(refresh_request(&secret, &csrf, &refresh)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(resp).await, "SESSION_REVOKED");
    }

    #[tokio::test]
    async fn test_refresh_picks_up_role_change() {
        let app = TestApp::new();
        let user = app.seed("promoted@example.com", UserRole::User).await;
        let refresh = app
            .middleware
            .issuer
            .issue_refresh_token(&Claims::for_user(&user))
            .unwrap();

        let promoted = user.clone().with_role(UserRole::Admin);
        app.repo.update(&promoted).await.unwrap();

        let (secret, csrf) = app.csrf().await;
        let resp = app.send(refresh_request(&secret, &csrf, &refresh)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        let claims = app
            .middleware
            .issuer
            .verify(body["accessToken"].as_str().unwrap(), TokenClass::Access)
            .unwrap();
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_refresh_requires_csrf() {
        let app = TestApp::new();
        let user = app.seed("csrf@example.com", UserRole::User).await;
        let refresh = app
            .middleware
            .issuer
            .issue_refresh_token(&Claims::for_user(&user))
            .unwrap();

        let resp = app
            .send(
                get("/api/auth/refresh")
                    .header(header::COOKIE, format!("refresh_token={refresh}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_code(resp).await, "INVALID_CSRF_TOKEN");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = TestApp::new();
        let (secret, csrf) = app.csrf().await;

        let resp = app
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .header(header::COOKIE, format!("csrf_secret={secret}"))
                    .header("x-csrf-token", csrf)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = raw_set_cookie(&resp, "refresh_token").unwrap();
        assert!(cookie.starts_with("refresh_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn test_me_requires_bearer() {
        let app = TestApp::new();
        let user = app.seed("me@example.com", UserRole::User).await;

        let resp = app.send(get("/api/auth/me").body(Body::empty()).unwrap()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(resp).await, "NO_TOKEN");

        let resp = app
            .send(
                get("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", app.access_token(&user)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["user"]["email"], "me@example.com");
        assert_eq!(body["user"]["role"], "user");
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_me_rejects_refresh_token() {
        let app = TestApp::new();
        let user = app.seed("me2@example.com", UserRole::User).await;
        let refresh = app
            .middleware
            .issuer
            .issue_refresh_token(&Claims::for_user(&user))
            .unwrap();

        let resp = app
            .send(
                get("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(resp).await, "MALFORMED_TOKEN");
    }

    #[tokio::test]
    async fn test_csrf_token_reuses_cookie_secret() {
        let app = TestApp::new();
        let (secret, _) = app.csrf().await;

        let resp = app
            .send(
                get("/api/csrf-token")
                    .header(header::COOKIE, format!("csrf_secret={secret}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(set_cookie(&resp, "csrf_secret").unwrap(), secret);
    }
}

#[cfg(test)]
mod admin_tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};

    use super::support::*;
    use crate::domain::entity::user::User;
    use crate::domain::repository::{CascadeCounts, UserRepository};
    use crate::domain::value_object::{user_id::UserId, user_role::UserRole};

    async fn admin_call(
        app: &TestApp,
        method: &str,
        uri: &str,
        actor: &User,
        with_csrf: bool,
    ) -> axum::http::Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", app.access_token(actor)));
        if with_csrf {
            let (secret, token) = app.csrf().await;
            builder = builder
                .header(header::COOKIE, format!("csrf_secret={secret}"))
                .header("x-csrf-token", token);
        }
        app.send(builder.body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_list_users_requires_admin() {
        let app = TestApp::new();
        let admin = app.seed("admin@example.com", UserRole::Admin).await;
        let user = app.seed("user@example.com", UserRole::User).await;

        let resp = app.send(get("/api/admin/users").body(Body::empty()).unwrap()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = admin_call(&app, "GET", "/api/admin/users", &user, false).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = admin_call(&app, "GET", "/api/admin/users", &admin, false).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.get("passwordHash").is_none()));
    }

    #[tokio::test]
    async fn test_no_self_delete() {
        let app = TestApp::new();
        let admin = app.seed("admin@example.com", UserRole::Admin).await;
        app.seed("second@example.com", UserRole::Admin).await;

        let uri = format!("/api/admin/users/{}", admin.user_id);
        let resp = admin_call(&app, "DELETE", &uri, &admin, true).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_code(resp).await, "FORBIDDEN");
        assert!(app.repo.find_by_id(&admin.user_id).await.unwrap().is_some());
        assert!(app.content.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_last_admin_guard() {
        let app = TestApp::new();
        // Actor holds a still-valid admin token but no longer has an account
        let stale_actor = User::new(
            crate::domain::value_object::display_name::DisplayName::new("Gone").unwrap(),
            crate::domain::value_object::email::Email::new("gone@example.com").unwrap(),
            password_hash(),
        )
        .with_role(UserRole::Admin);
        let last_admin = app.seed("last@example.com", UserRole::Admin).await;

        let uri = format!("/api/admin/users/{}", last_admin.user_id);
        let resp = admin_call(&app, "DELETE", &uri, &stale_actor, true).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(app.repo.find_by_id(&last_admin.user_id).await.unwrap().is_some());

        // With a second active admin the delete goes through
        app.seed("backup@example.com", UserRole::Admin).await;
        let resp = admin_call(&app, "DELETE", &uri, &stale_actor, true).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_cascades_and_reports_counts() {
        let app = TestApp::new();
        let admin = app.seed("admin@example.com", UserRole::Admin).await;
        let author = app.seed("author@example.com", UserRole::User).await;
        app.content
            .set(
                author.user_id,
                CascadeCounts {
                    posts_deleted: 3,
                    comments_deleted: 5,
                },
            )
            .await;

        let uri = format!("/api/admin/users/{}", author.user_id);
        let resp = admin_call(&app, "DELETE", &uri, &admin, true).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["postsDeleted"], 3);
        assert_eq!(body["commentsDeleted"], 5);
        assert!(app.repo.find_by_id(&author.user_id).await.unwrap().is_none());
        assert_eq!(*app.content.calls.lock().await, vec![author.user_id]);
    }

    #[tokio::test]
    async fn test_failed_cascade_keeps_user() {
        let app = TestApp::with_content(FakeContent::failing());
        let admin = app.seed("admin@example.com", UserRole::Admin).await;
        let author = app.seed("author@example.com", UserRole::User).await;

        let uri = format!("/api/admin/users/{}", author.user_id);
        let resp = admin_call(&app, "DELETE", &uri, &admin, true).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(resp).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body["detail"].as_str().unwrap().contains("unavailable"));
        assert!(app.repo.find_by_id(&author.user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_mutations_require_csrf() {
        let app = TestApp::new();
        let admin = app.seed("admin@example.com", UserRole::Admin).await;
        let user = app.seed("user@example.com", UserRole::User).await;

        let uri = format!("/api/admin/users/{}", user.user_id);
        let resp = admin_call(&app, "DELETE", &uri, &admin, false).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_code(resp).await, "INVALID_CSRF_TOKEN");
        assert!(app.repo.find_by_id(&user.user_id).await.unwrap().is_some());

        let resp = admin_call(&app, "DELETE", &uri, &admin, true).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_unknown_or_invalid_id() {
        let app = TestApp::new();
        let admin = app.seed("admin@example.com", UserRole::Admin).await;

        let uri = format!("/api/admin/users/{}", UserId::new());
        let resp = admin_call(&app, "DELETE", &uri, &admin, true).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_code(resp).await, "USER_NOT_FOUND");

        let resp = admin_call(&app, "DELETE", "/api/admin/users/not-a-uuid", &admin, true).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ban_and_unban() {
        let app = TestApp::new();
        let admin = app.seed("admin@example.com", UserRole::Admin).await;
        let user = app.seed("user@example.com", UserRole::User).await;

        let uri = format!("/api/admin/users/{}/ban", user.user_id);
        let resp = admin_call(&app, "PATCH", &uri, &admin, true).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["user"]["isActive"], false);
        assert_eq!(body["user"]["bannedBy"], admin.user_id.to_string());

        let stored = app.repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert!(!stored.is_active);

        let uri = format!("/api/admin/users/{}/unban", user.user_id);
        let resp = admin_call(&app, "PATCH", &uri, &admin, true).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["user"]["isActive"], true);
        assert!(body["user"]["bannedAt"].is_null());
    }

    #[tokio::test]
    async fn test_admins_cannot_be_banned() {
        let app = TestApp::new();
        let admin = app.seed("admin@example.com", UserRole::Admin).await;
        let other = app.seed("other@example.com", UserRole::Admin).await;

        for target in [&admin, &other] {
            let uri = format!("/api/admin/users/{}/ban", target.user_id);
            let resp = admin_call(&app, "PATCH", &uri, &admin, true).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        }
    }

    /// Holds every cascade until both deletes have passed their admin count
    #[derive(Clone)]
    struct LockstepContent {
        barrier: std::sync::Arc<tokio::sync::Barrier>,
    }

    impl crate::domain::repository::AuthoredContentRepository for LockstepContent {
        async fn delete_authored_by(
            &self,
            _author_id: &UserId,
        ) -> crate::error::AuthResult<CascadeCounts> {
            self.barrier.wait().await;
            Ok(CascadeCounts::default())
        }
    }

    #[tokio::test]
    async fn test_admins_deleting_each_other_keep_one() {
        use std::sync::Arc;

        use crate::application::admin_users::AdminUsersUseCase;
        use crate::domain::entity::auth_context::AuthContext;
        use crate::error::AuthError;

        let app = TestApp::new();
        let first = app.seed("first@example.com", UserRole::Admin).await;
        let second = app.seed("second@example.com", UserRole::Admin).await;

        let content = LockstepContent {
            barrier: Arc::new(tokio::sync::Barrier::new(2)),
        };
        let use_case = AdminUsersUseCase::new(Arc::new(app.repo.clone()), Arc::new(content));
        let as_first = AuthContext::new(first.user_id, first.email.clone(), first.role);
        let as_second = AuthContext::new(second.user_id, second.email.clone(), second.role);

        let (a, b) = tokio::join!(
            use_case.delete(&as_first, &second.user_id),
            use_case.delete(&as_second, &first.user_id),
        );

        let refused: Vec<_> = [a, b].into_iter().filter_map(Result::err).collect();
        assert_eq!(refused.len(), 1);
        assert!(matches!(&refused[0], AuthError::Forbidden(reason) if reason.contains("last active admin")));
        assert_eq!(app.repo.count_active_by_role(UserRole::Admin).await.unwrap(), 1);
    }
}

//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::AccountService;
use crate::interfaces::http::middleware::auth_middleware;
use crate::interfaces::http::modules::{auth, health, users};

/// Shared state for every route. One service object behind an `Arc`;
/// the repositories inside it decide whether this is the SQLite wiring
/// or the in-memory one.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self {
            accounts,
            started_at: Arc::new(Instant::now()),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("opaque")
                        .description(Some("Opaque token from POST /login/"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::signup,
        auth::login,
        // Users
        users::list_users,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::TokenResponse,
            users::UserDto,
            users::UpdateUserRequest,
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Account signup and login with opaque bearer tokens"),
        (name = "Users", description = "Public account listing, owner-only update and delete"),
    ),
    info(
        title = "Account Service API",
        version = "1.0.0",
        description = "Minimal user-account service: signup, login, public listing, owner-gated profile management",
    )
)]
pub struct ApiDoc;

/// Create the router with all routes
///
/// Listing, signup and login are public. `/users/{id}` mutations sit
/// behind the bearer-token middleware; ownership is enforced one layer
/// down, in the service.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/signup/", post(auth::signup))
        .route("/login/", post(auth::login))
        .route("/users/", get(users::list_users));

    let protected_routes = Router::new()
        .route(
            "/users/{id}",
            patch(users::update_user).delete(users::delete_user),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::InMemoryStore;

    fn app() -> Router {
        let store = Arc::new(InMemoryStore::new());
        let accounts = Arc::new(AccountService::new(store.clone(), store));
        create_router(AppState::new(accounts))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json");
        match body {
            Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn signup(app: &Router, username: &str, email: &str, password: &str) -> Value {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/signup/",
                json!({"username": username, "email": email, "password": password}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        body
    }

    async fn login(app: &Router, username: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/login/",
                json!({"username": username, "password": password}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    // ── Signup ──────────────────────────────────────────────────

    #[tokio::test]
    async fn signup_returns_public_projection_only() {
        let app = app();
        let body = signup(&app, "alice", "alice@example.com", "correct horse").await;

        assert_eq!(body["username"], "alice");
        assert_eq!(body["email"], "alice@example.com");
        assert!(body["id"].as_i64().unwrap() >= 1);

        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3, "unexpected fields in {body}");
        assert!(!body.to_string().contains("password"));
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "pw").await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/signup/",
                json!({"username": "alice2", "email": "alice@example.com", "password": "pw"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["email"][0], "This field must be unique.");
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_username() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "pw").await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/signup/",
                json!({"username": "alice", "email": "other@example.com", "password": "pw"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["username"][0],
            "A user with that username already exists."
        );
    }

    #[tokio::test]
    async fn signup_can_report_both_taken_fields_at_once() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "pw").await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/signup/",
                json!({"username": "alice", "email": "alice@example.com", "password": "pw"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("username").is_some());
        assert!(body.get("email").is_some());
    }

    #[tokio::test]
    async fn signup_rejects_invalid_email_syntax() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/signup/",
                json!({"username": "alice", "email": "not-an-email", "password": "pw"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["email"][0], "Enter a valid email address.");
    }

    #[tokio::test]
    async fn signup_rejects_blank_password() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/signup/",
                json!({"username": "alice", "email": "alice@example.com", "password": ""}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["password"][0], "This field may not be blank.");
    }

    // ── Login ───────────────────────────────────────────────────

    #[tokio::test]
    async fn login_mints_once_and_reuses() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "correct horse").await;

        let first = login(&app, "alice", "correct horse").await;
        let second = login(&app, "alice", "correct horse").await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 40);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn login_failures_are_byte_identical() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "correct horse").await;

        let (unknown_status, unknown_body) = send(
            &app,
            json_request(
                "POST",
                "/login/",
                json!({"username": "nobody", "password": "whatever"}),
            ),
        )
        .await;
        let (wrong_status, wrong_body) = send(
            &app,
            json_request(
                "POST",
                "/login/",
                json!({"username": "alice", "password": "wrong"}),
            ),
        )
        .await;

        assert_eq!(unknown_status, StatusCode::NOT_FOUND);
        assert_eq!(wrong_status, StatusCode::NOT_FOUND);
        assert_eq!(unknown_body, wrong_body);
        assert_eq!(unknown_body, json!({"detail": "Not found."}));
    }

    // ── Listing ─────────────────────────────────────────────────

    #[tokio::test]
    async fn listing_is_public_and_ordered_by_id() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "pw").await;
        signup(&app, "bob", "bob@example.com", "pw").await;

        let request = Request::builder()
            .uri("/users/")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[0]["id"].as_i64().unwrap() < users[1]["id"].as_i64().unwrap());
        assert_eq!(users[0]["username"], "alice");
        assert!(!body.to_string().contains("password"));
    }

    // ── Update ──────────────────────────────────────────────────

    #[tokio::test]
    async fn update_requires_a_token() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "pw").await;
        let id = alice["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            json_request("PATCH", &format!("/users/{id}"), json!({"username": "a2"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["detail"],
            "Authentication credentials were not provided."
        );

        let (status, body) = send(
            &app,
            authed_request(
                "PATCH",
                &format!("/users/{id}"),
                "0000000000000000000000000000000000000000",
                Some(json!({"username": "a2"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid token.");
    }

    #[tokio::test]
    async fn update_rejects_non_bearer_scheme() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "pw").await;
        let token = login(&app, "alice", "pw").await;

        let request = Request::builder()
            .method("PATCH")
            .uri("/users/1")
            .header(header::AUTHORIZATION, format!("Token {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"username": "a2"}).to_string()))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid authorization header.");
    }

    #[tokio::test]
    async fn owner_can_update_email() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "pw").await;
        let id = alice["id"].as_i64().unwrap();
        let token = login(&app, "alice", "pw").await;

        let (status, body) = send(
            &app,
            authed_request(
                "PATCH",
                &format!("/users/{id}"),
                &token,
                Some(json!({"email": "new@example.com"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "new@example.com");
        assert_eq!(body["username"], "alice");
        assert_eq!(body["id"].as_i64().unwrap(), id);
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "pw").await;
        signup(&app, "bob", "bob@example.com", "pw").await;
        let bob_token = login(&app, "bob", "pw").await;
        let alice_id = alice["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            authed_request(
                "PATCH",
                &format!("/users/{alice_id}"),
                &bob_token,
                Some(json!({"email": "stolen@example.com"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "You do not have permission to view this user");
    }

    #[tokio::test]
    async fn missing_target_is_not_found_even_for_strangers() {
        let app = app();
        signup(&app, "alice", "alice@example.com", "pw").await;
        let token = login(&app, "alice", "pw").await;

        // 404 must win over 403, otherwise responses would reveal
        // which ids exist.
        let (status, body) = send(
            &app,
            authed_request("PATCH", "/users/4242", &token, Some(json!({"username": "x"}))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Not found."}));

        let (status, _) = send(&app, authed_request("DELETE", "/users/4242", &token, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "pw").await;
        signup(&app, "bob", "bob@example.com", "pw").await;
        let token = login(&app, "alice", "pw").await;
        let id = alice["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            authed_request(
                "PATCH",
                &format!("/users/{id}"),
                &token,
                Some(json!({"email": "bob@example.com"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["email"][0], "This field must be unique.");
    }

    #[tokio::test]
    async fn update_with_empty_body_changes_nothing() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "pw").await;
        let id = alice["id"].as_i64().unwrap();
        let token = login(&app, "alice", "pw").await;

        let (status, body) = send(
            &app,
            authed_request("PATCH", &format!("/users/{id}"), &token, Some(json!({}))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn password_update_rotates_credentials_not_the_token() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "old phrase").await;
        let id = alice["id"].as_i64().unwrap();
        let token = login(&app, "alice", "old phrase").await;

        let (status, _) = send(
            &app,
            authed_request(
                "PATCH",
                &format!("/users/{id}"),
                &token,
                Some(json!({"password": "new phrase"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Old password is now a failed login, same shape as unknown user.
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/login/",
                json!({"username": "alice", "password": "old phrase"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Not found."}));

        // New password logs in and gets the same token back.
        let fresh = login(&app, "alice", "new phrase").await;
        assert_eq!(fresh, token);
    }

    // ── Delete ──────────────────────────────────────────────────

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "pw").await;
        signup(&app, "bob", "bob@example.com", "pw").await;
        let bob_token = login(&app, "bob", "pw").await;
        let alice_id = alice["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            authed_request("DELETE", &format!("/users/{alice_id}"), &bob_token, None),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn delete_removes_account_and_revokes_token() {
        let app = app();
        let alice = signup(&app, "alice", "alice@example.com", "pw").await;
        let id = alice["id"].as_i64().unwrap();
        let token = login(&app, "alice", "pw").await;

        let (status, body) = send(
            &app,
            authed_request("DELETE", &format!("/users/{id}"), &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null, "delete body must be empty");

        // Gone from the listing.
        let request = Request::builder()
            .uri("/users/")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body.as_array().unwrap().len(), 0);

        // The cascade took the token with it.
        let (status, body) = send(
            &app,
            authed_request("DELETE", &format!("/users/{id}"), &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid token.");

        // And logging in again finds no account.
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/login/",
                json!({"username": "alice", "password": "pw"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ── End to end ──────────────────────────────────────────────

    #[tokio::test]
    async fn full_account_lifecycle() {
        let app = app();

        let carol = signup(&app, "carol", "carol@example.com", "opening night").await;
        let id = carol["id"].as_i64().unwrap();

        let token = login(&app, "carol", "opening night").await;

        let (status, body) = send(
            &app,
            authed_request(
                "PATCH",
                &format!("/users/{id}"),
                &token,
                Some(json!({"email": "carol@new.example.com"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "carol@new.example.com");

        let request = Request::builder()
            .uri("/users/")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body[0]["email"], "carol@new.example.com");

        let (status, _) = send(
            &app,
            authed_request("DELETE", &format!("/users/{id}"), &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let request = Request::builder()
            .uri("/users/")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body.as_array().unwrap().len(), 0);
    }

    // ── Health ──────────────────────────────────────────────────

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["version"].as_str().is_some());
    }
}

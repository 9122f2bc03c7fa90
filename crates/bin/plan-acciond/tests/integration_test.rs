//! End-to-end tests for the full plan-acciond stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real argon2 hasher, real axum router) and exercises the HTTP
//! layer via `tower::ServiceExt::oneshot`. No TCP port is bound.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use plan_accion_adapter_http_axum::{AppState, SessionSettings, router};
use plan_accion_adapter_password_argon2::Argon2PasswordHasher;
use plan_accion_adapter_storage_sqlite_sqlx::{Config, SqliteRepositories};
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@example.org";
const ADMIN_PASSWORD: &str = "admin-password";

/// A fully-wired router with a bootstrapped administrator.
struct TestApp {
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    body: Value,
    cookie: Option<String>,
}

impl TestApp {
    async fn new() -> Self {
        let db = Config::memory()
            .build()
            .await
            .expect("in-memory database should initialise");
        let state = AppState::new(
            SqliteRepositories::from_database(&db),
            Argon2PasswordHasher,
            SessionSettings::ephemeral(false),
        );
        state
            .auth
            .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin")
            .await
            .expect("admin bootstrap should succeed");
        Self {
            router: router::build(state),
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            body,
            cookie,
        }
    }

    async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    async fn admin_session(&self) -> String {
        let resp = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(resp.status, StatusCode::OK);
        resp.cookie.expect("login should set a session cookie")
    }

    async fn register(&self, email: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": email,
                "password": "member-password",
                "name": "Member",
                "requested_area": "Finanzas",
            })),
        )
        .await
    }

    async fn create_area(&self, admin: &str, name: &str) -> i64 {
        let resp = self
            .send(
                Method::POST,
                "/api/areas",
                Some(admin),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        resp.body["data"]["id"].as_i64().unwrap()
    }

    /// Register, approve into `area_id` and log in a regular user.
    async fn member(&self, admin: &str, email: &str, area_id: i64) -> (i64, String) {
        let resp = self.register(email).await;
        assert_eq!(resp.status, StatusCode::CREATED);
        let user_id = resp.body["data"]["id"].as_i64().unwrap();

        let resp = self
            .send(
                Method::PATCH,
                &format!("/api/admin/users/{user_id}/approve"),
                Some(admin),
                Some(json!({ "area_id": area_id })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK);

        let resp = self.login(email, "member-password").await;
        assert_eq!(resp.status, StatusCode::OK);
        (user_id, resp.cookie.unwrap())
    }

    async fn create_goal(&self, session: &str, text: &str) -> i64 {
        let resp = self
            .send(
                Method::POST,
                "/api/goals",
                Some(session),
                Some(json!({ "text": text })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        resp.body["data"]["id"].as_i64().unwrap()
    }

    async fn submit_evidence(&self, session: &str, goal_id: i64, file_name: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/evidence",
            Some(session),
            Some(json!({
                "goal_id": goal_id,
                "quarter": 1,
                "year": 2025,
                "file_url": format!("https://files.example.org/{file_name}"),
                "file_name": file_name,
                "mime_type": "application/pdf",
                "size_bytes": 2048,
            })),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Health & sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = TestApp::new().await;
    let resp = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_set_session_cookie_on_login_and_resolve_me() {
    let app = TestApp::new().await;
    let resp = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["role"], "admin");
    assert!(resp.body["data"].get("password_hash").is_none());

    let cookie = resp.cookie.unwrap();
    assert!(cookie.starts_with("user_id="));
    let resp = app.send(Method::GET, "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn should_clear_session_cookie_on_logout() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let resp = app
        .send(Method::POST, "/api/auth/logout", Some(&admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "logged out");
    assert_eq!(resp.cookie.as_deref(), Some("user_id="));
}

#[tokio::test]
async fn should_edit_own_profile_and_password() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;

    let resp = app
        .send(
            Method::PUT,
            "/api/users/me",
            Some(&member),
            Some(json!({ "name": "Ana María", "photo_url": "https://cdn.example.org/a.png" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["name"], "Ana María");
    assert_eq!(resp.body["data"]["photo_url"], "https://cdn.example.org/a.png");

    let resp = app
        .send(
            Method::PUT,
            "/api/users/me",
            Some(&member),
            Some(json!({ "photo_url": "" })),
        )
        .await;
    assert!(resp.body["data"]["photo_url"].is_null());
    assert_eq!(resp.body["data"]["name"], "Ana María");

    let resp = app
        .send(
            Method::PUT,
            "/api/users/me/password",
            Some(&member),
            Some(json!({ "current_password": "wrong-password", "new_password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::PUT,
            "/api/users/me/password",
            Some(&member),
            Some(json!({ "current_password": "member-password", "new_password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        app.login("member@example.org", "brand-new-pass").await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn should_reject_wrong_credentials_with_unauthorized() {
    let app = TestApp::new().await;

    let resp = app.login(ADMIN_EMAIL, "wrong-password").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(resp.cookie.is_none());
    assert!(resp.body["error"].is_string());

    let resp = app.login("nobody@example.org", ADMIN_PASSWORD).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_session_and_admin_role() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;

    let resp = app.send(Method::GET, "/api/admin/users", None, None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app
        .send(Method::GET, "/api/admin/users", Some(&member), None)
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .send(Method::GET, "/api/admin/users", Some(&admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Registration & approval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_duplicate_registration() {
    let app = TestApp::new().await;
    assert_eq!(
        app.register("member@example.org").await.status,
        StatusCode::CREATED
    );

    let resp = app.register("MEMBER@example.org").await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_forbid_login_until_approved() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;

    let resp = app.register("pending@example.org").await;
    assert_eq!(resp.body["data"]["status"], "pendiente");
    let resp = app.login("pending@example.org", "member-password").await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.register("rejected@example.org").await;
    let user_id = resp.body["data"]["id"].as_i64().unwrap();
    let resp = app
        .send(
            Method::PATCH,
            &format!("/api/admin/users/{user_id}/reject"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let resp = app.login("rejected@example.org", "member-password").await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_protect_last_administrator() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let resp = app.send(Method::GET, "/api/auth/me", Some(&admin), None).await;
    let admin_id = resp.body["data"]["id"].as_i64().unwrap();

    let resp = app
        .send(
            Method::DELETE,
            &format!("/api/admin/users/{admin_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = app
        .send(
            Method::PATCH,
            &format!("/api/admin/users/{admin_id}/role"),
            Some(&admin),
            Some(json!({ "role": "usuario" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = app.send(Method::GET, "/api/auth/me", Some(&admin), None).await;
    assert_eq!(resp.body["data"]["role"], "admin");
}

#[tokio::test]
async fn should_not_promote_pending_accounts_to_administrator() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let resp = app.send(Method::GET, "/api/auth/me", Some(&admin), None).await;
    let admin_id = resp.body["data"]["id"].as_i64().unwrap();

    let resp = app.register("pending@example.org").await;
    let pending_id = resp.body["data"]["id"].as_i64().unwrap();
    let resp = app
        .send(
            Method::PATCH,
            &format!("/api/admin/users/{pending_id}/role"),
            Some(&admin),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::DELETE,
            &format!("/api/admin/users/{admin_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(
        app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn should_assign_area_and_reset_password() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let finanzas = app.create_area(&admin, "Finanzas").await;
    let compras = app.create_area(&admin, "Compras").await;
    let (user_id, _) = app.member(&admin, "member@example.org", finanzas).await;

    let area_uri = format!("/api/admin/users/{user_id}/area");
    let resp = app
        .send(
            Method::PATCH,
            &area_uri,
            Some(&admin),
            Some(json!({ "area_id": compras })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["area_id"], compras);

    let resp = app
        .send(Method::PATCH, &area_uri, Some(&admin), Some(json!({})))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["data"]["area_id"].is_null());

    let password_uri = format!("/api/admin/users/{user_id}/password");
    let resp = app
        .send(
            Method::PUT,
            &password_uri,
            Some(&admin),
            Some(json!({ "new_password": "short" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::PUT,
            &password_uri,
            Some(&admin),
            Some(json!({ "new_password": "reset-by-admin" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        app.login("member@example.org", "member-password").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login("member@example.org", "reset-by-admin").await.status,
        StatusCode::OK
    );
}

// ---------------------------------------------------------------------------
// Areas
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_refuse_to_delete_area_in_use() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let used = app.create_area(&admin, "Finanzas").await;
    let unused = app.create_area(&admin, "Compras").await;
    app.member(&admin, "member@example.org", used).await;

    let resp = app
        .send(Method::DELETE, &format!("/api/areas/{used}"), Some(&admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = app
        .send(Method::DELETE, &format!("/api/areas/{unused}"), Some(&admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app.send(Method::GET, "/api/areas", Some(&admin), None).await;
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Axes & tracking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_manage_axes_and_sub_axes() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;

    let resp = app
        .send(
            Method::POST,
            "/api/axes",
            Some(&member),
            Some(json!({ "name": "Social" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .send(
            Method::POST,
            "/api/axes",
            Some(&admin),
            Some(json!({ "name": "Social", "description": "Impacto social" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let axis_id = resp.body["data"]["id"].as_i64().unwrap();

    let resp = app
        .send(
            Method::POST,
            &format!("/api/axes/{axis_id}/sub-axes"),
            Some(&admin),
            Some(json!({ "name": "Salud" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let sub_axis_id = resp.body["data"]["id"].as_i64().unwrap();

    let resp = app
        .send(
            Method::PUT,
            &format!("/api/axes/{axis_id}"),
            Some(&admin),
            Some(json!({ "name": "Social y comunitario" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.send(Method::GET, "/api/axes", Some(&member), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let axes = resp.body["data"].as_array().unwrap();
    assert_eq!(axes.len(), 1);
    assert_eq!(axes[0]["name"], "Social y comunitario");
    assert_eq!(axes[0]["sub_axes"][0]["id"], sub_axis_id);

    let resp = app
        .send(
            Method::DELETE,
            &format!("/api/sub-axes/{sub_axis_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = app
        .send(Method::GET, &format!("/api/axes/{axis_id}"), Some(&member), None)
        .await;
    assert!(resp.body["data"]["sub_axes"].as_array().unwrap().is_empty());

    let resp = app
        .send(Method::DELETE, &format!("/api/axes/{axis_id}"), Some(&admin), None)
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = app
        .send(Method::GET, &format!("/api/axes/{axis_id}"), Some(&member), None)
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_track_axes_only_within_own_area() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let finanzas = app.create_area(&admin, "Finanzas").await;
    let compras = app.create_area(&admin, "Compras").await;
    let (_, member) = app.member(&admin, "member@example.org", finanzas).await;
    let resp = app
        .send(
            Method::POST,
            "/api/axes",
            Some(&admin),
            Some(json!({ "name": "Social" })),
        )
        .await;
    let axis_id = resp.body["data"]["id"].as_i64().unwrap();

    let own_uri = format!("/api/areas/{finanzas}/axis-tracking");
    let track = |selected: bool| {
        app.send(
            Method::PUT,
            &own_uri,
            Some(&member),
            Some(json!({ "axis_id": axis_id, "quarter": 2, "selected": selected })),
        )
    };
    assert_eq!(track(true).await.status, StatusCode::OK);
    let resp = track(false).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["selected"], false);

    let resp = app
        .send(
            Method::GET,
            &format!("{own_uri}?quarter=2"),
            Some(&member),
            None,
        )
        .await;
    let rows = resp.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["axis_id"], axis_id);
    assert_eq!(rows[0]["selected"], false);

    let resp = app
        .send(
            Method::PUT,
            &format!("/api/areas/{compras}/axis-tracking"),
            Some(&member),
            Some(json!({ "axis_id": axis_id, "quarter": 2, "selected": true })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .send(
            Method::GET,
            &format!("/api/areas/{compras}/axis-tracking"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_read_update_and_delete_goal() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, owner) = app.member(&admin, "owner@example.org", area_id).await;
    let (_, other) = app.member(&admin, "other@example.org", area_id).await;
    let goal_id = app.create_goal(&owner, "Reducir costos").await;
    let goal_uri = format!("/api/goals/{goal_id}");

    let resp = app.send(Method::GET, &goal_uri, Some(&owner), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["status"], "pendiente");
    let resp = app.send(Method::GET, &goal_uri, Some(&other), None).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .send(
            Method::PUT,
            &goal_uri,
            Some(&owner),
            Some(json!({ "text": "Reducir costos 15%", "status": "en_progreso" })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["text"], "Reducir costos 15%");
    assert_eq!(resp.body["data"]["status"], "en_progreso");

    let resp = app
        .send(Method::PUT, &goal_uri, Some(&owner), Some(json!({ "text": "  " })))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.send(Method::DELETE, &goal_uri, Some(&other), None).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    let resp = app.send(Method::DELETE, &goal_uri, Some(&owner), None).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let resp = app.send(Method::GET, &goal_uri, Some(&owner), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_sub_axis_from_another_axis() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;

    let mut axis_ids = Vec::new();
    for name in ["Social", "Ambiental"] {
        let resp = app
            .send(
                Method::POST,
                "/api/axes",
                Some(&admin),
                Some(json!({ "name": name })),
            )
            .await;
        axis_ids.push(resp.body["data"]["id"].as_i64().unwrap());
    }
    let resp = app
        .send(
            Method::POST,
            &format!("/api/axes/{}/sub-axes", axis_ids[0]),
            Some(&admin),
            Some(json!({ "name": "Salud" })),
        )
        .await;
    let sub_axis_id = resp.body["data"]["id"].as_i64().unwrap();

    let resp = app
        .send(
            Method::POST,
            "/api/goals",
            Some(&member),
            Some(json!({ "text": "Meta", "axis_id": axis_ids[1], "sub_axis_id": sub_axis_id })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::POST,
            "/api/goals",
            Some(&member),
            Some(json!({ "text": "Meta", "axis_id": axis_ids[0], "sub_axis_id": sub_axis_id })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let goal_id = resp.body["data"]["id"].as_i64().unwrap();

    let resp = app
        .send(
            Method::PUT,
            &format!("/api/goals/{goal_id}"),
            Some(&member),
            Some(json!({ "axis_id": axis_ids[1] })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Evidence & grading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_keep_single_evidence_per_goal_and_period() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;
    let goal_id = app.create_goal(&member, "Reducir costos 10%").await;

    let first = app.submit_evidence(&member, goal_id, "v1.pdf").await;
    assert_eq!(first.status, StatusCode::CREATED);
    let second = app.submit_evidence(&member, goal_id, "v2.pdf").await;
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(first.body["data"]["id"], second.body["data"]["id"]);

    let resp = app
        .send(
            Method::GET,
            &format!("/api/evidence?goal_id={goal_id}"),
            Some(&member),
            None,
        )
        .await;
    let evidence = resp.body["data"].as_array().unwrap();
    assert_eq!(evidence.len(), 1);
    assert_eq!(evidence[0]["file"]["name"], "v2.pdf");
}

#[tokio::test]
async fn should_reject_scores_outside_range() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (user_id, member) = app.member(&admin, "member@example.org", area_id).await;
    let goal_id = app.create_goal(&member, "Reducir costos 10%").await;
    let resp = app.submit_evidence(&member, goal_id, "v1.pdf").await;
    let evidence_id = resp.body["data"]["id"].as_i64().unwrap();

    let review_uri = format!("/api/admin/evidence/{evidence_id}/review");
    let review = |score: Value| {
        app.send(
            Method::PATCH,
            &review_uri,
            Some(&admin),
            Some(json!({ "score": score })),
        )
    };
    assert_eq!(review(json!(150)).await.status, StatusCode::BAD_REQUEST);
    assert_eq!(review(json!(-1)).await.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::PUT,
            "/api/admin/grades",
            Some(&admin),
            Some(json!({
                "user_id": user_id,
                "area_id": area_id,
                "quarter": 1,
                "year": 2025,
                "score": 100.5,
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::GET,
            &format!("/api/evidence/{evidence_id}"),
            Some(&member),
            None,
        )
        .await;
    assert!(resp.body["data"]["score"].is_null());
}

#[tokio::test]
async fn should_auto_grade_quarter_from_reviewed_evidence() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (user_id, member) = app.member(&admin, "member@example.org", area_id).await;

    for (text, score) in [("Reducir costos", 80), ("Automatizar reportes", 90)] {
        let goal_id = app.create_goal(&member, text).await;
        let resp = app.submit_evidence(&member, goal_id, "informe.pdf").await;
        let evidence_id = resp.body["data"]["id"].as_i64().unwrap();
        let resp = app
            .send(
                Method::PATCH,
                &format!("/api/admin/evidence/{evidence_id}/review"),
                Some(&admin),
                Some(json!({ "score": score, "observation": "ok" })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    let resp = app
        .send(
            Method::PUT,
            "/api/admin/grades",
            Some(&admin),
            Some(json!({
                "user_id": user_id,
                "area_id": area_id,
                "quarter": 1,
                "year": 2025,
                "auto": true,
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["score"].as_f64(), Some(85.0));
    assert_eq!(resp.body["data"]["auto_calculated"], true);

    let resp = app.send(Method::GET, "/api/grades", Some(&member), None).await;
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_open_evidence_slots_once_per_goal() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;
    let first = app.create_goal(&member, "Reducir costos").await;
    app.create_goal(&member, "Automatizar reportes").await;

    let resp = app
        .send(
            Method::POST,
            "/api/admin/evidence/slots",
            Some(&admin),
            Some(json!({ "goal_id": first, "quarter": 1, "year": 2025 })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["data"], json!({ "created": 1, "existing": 0 }));

    let resp = app
        .send(
            Method::POST,
            "/api/admin/evidence/slots",
            Some(&admin),
            Some(json!({ "area_id": area_id, "quarter": 1, "year": 2025 })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["data"], json!({ "created": 1, "existing": 1 }));

    let resp = app
        .send(
            Method::POST,
            "/api/admin/evidence/slots",
            Some(&admin),
            Some(json!({ "goal_id": first, "area_id": area_id, "quarter": 1, "year": 2025 })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::POST,
            "/api/admin/evidence/slots",
            Some(&member),
            Some(json!({ "area_id": area_id, "quarter": 1, "year": 2025 })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let slot = app.submit_evidence(&member, first, "informe.pdf").await;
    assert_eq!(slot.status, StatusCode::CREATED);
    let resp = app.send(Method::GET, "/api/evidence", Some(&member), None).await;
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Quarter selections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_keep_one_selection_per_quarter() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;

    for (quarter, year, selected) in [(1, 2025, true), (1, 2025, false), (3, 2024, true)] {
        let resp = app
            .send(
                Method::PUT,
                "/api/selections",
                Some(&member),
                Some(json!({ "quarter": quarter, "year": year, "selected": selected })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"]["selected"], selected);
    }

    let resp = app
        .send(Method::GET, "/api/selections?year=2025", Some(&member), None)
        .await;
    let rows = resp.body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quarter"], 1);
    assert_eq!(rows[0]["selected"], false);

    let resp = app.send(Method::GET, "/api/selections", Some(&admin), None).await;
    assert!(resp.body["data"].as_array().unwrap().is_empty());

    let resp = app
        .send(
            Method::PUT,
            "/api/selections",
            Some(&member),
            Some(json!({ "quarter": 5, "year": 2025, "selected": true })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Submission windows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_submission_outside_window() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;
    let goal_id = app.create_goal(&member, "Reducir costos 10%").await;

    let resp = app
        .send(
            Method::POST,
            "/api/submission-windows",
            Some(&admin),
            Some(json!({
                "quarter": 1,
                "year": 2025,
                "opens_at": "2020-01-01T00:00:00Z",
                "closes_at": "2020-02-01T00:00:00Z",
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = app.submit_evidence(&member, goal_id, "late.pdf").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .send(
            Method::GET,
            &format!("/api/evidence?goal_id={goal_id}"),
            Some(&member),
            None,
        )
        .await;
    assert!(resp.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_return_current_window_for_period() {
    let app = TestApp::new().await;
    let admin = app.admin_session().await;
    let area_id = app.create_area(&admin, "Finanzas").await;
    let (_, member) = app.member(&admin, "member@example.org", area_id).await;

    let current_uri = "/api/submission-windows/current?quarter=2&year=2025";
    let resp = app.send(Method::GET, current_uri, Some(&member), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app
        .send(
            Method::POST,
            "/api/submission-windows",
            Some(&admin),
            Some(json!({
                "quarter": 2,
                "year": 2025,
                "opens_at": "2025-04-01T00:00:00Z",
                "closes_at": "2025-06-30T23:59:59Z",
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let window_id = resp.body["data"]["id"].clone();

    let resp = app.send(Method::GET, current_uri, Some(&member), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["id"], window_id);

    let resp = app
        .send(
            Method::GET,
            "/api/submission-windows/current?quarter=3&year=2025",
            Some(&member),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

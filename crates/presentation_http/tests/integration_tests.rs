//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use application::NewUserRequest;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::{TestResponse, TestServer};
use infrastructure::{AppConfig, AuthProviderConfig, EnvSnapshot};
use presentation_http::{AppState, build_state, create_router};
use serde_json::Value;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "correct horse battery";

fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.path = ":memory:".to_string();
    config
}

fn hx() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("hx-request"),
        HeaderValue::from_static("true"),
    )
}

async fn setup_with(config: AppConfig, env: EnvSnapshot) -> (TestServer, AppState) {
    let state = build_state(config, env).expect("state");
    state
        .users
        .create_superuser(NewUserRequest {
            email: ADMIN_EMAIL.to_string(),
            first_name: "Ada".to_string(),
            last_name: String::new(),
            password: ADMIN_PASSWORD.to_string(),
            is_superuser: true,
        })
        .await
        .expect("superuser");
    let server = TestServer::new(create_router(state.clone())).expect("server");
    (server, state)
}

async fn setup() -> (TestServer, AppState) {
    setup_with(memory_config(), EnvSnapshot::default()).await
}

/// `name=value` pair of the session cookie set by a response
fn session_cookie_pair(response: &TestResponse) -> HeaderValue {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .unwrap()
        .to_string();
    let pair = set_cookie.split(';').next().unwrap().trim().to_string();
    assert!(pair.starts_with("sessionid="));
    HeaderValue::from_str(&pair).unwrap()
}

async fn login(server: &TestServer, email: &str, password: &str) -> HeaderValue {
    let response = server
        .post("/login")
        .form(&[("email", email), ("password", password)])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    session_cookie_pair(&response)
}

fn header_str<'a>(response: &'a TestResponse, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn health_check_reports_ok() {
    let (server, _) = setup().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn login_sets_http_only_cookie_and_redirects_home() {
    let (server, _) = setup().await;
    let response = server
        .post("/login")
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(header_str(&response, "location"), Some("/"));
    let set_cookie = header_str(&response, "set-cookie").unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=2592000"));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (server, _) = setup().await;
    let response = server
        .post("/login")
        .form(&[("email", ADMIN_EMAIL), ("password", "not the password")])
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn index_redirects_to_start_page() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = server.get("/").add_header(header::COOKIE, cookie).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(header_str(&response, "location"), Some("/monthly/"));
}

#[tokio::test]
async fn anonymous_browser_requests_go_to_login() {
    let (server, _) = setup().await;
    let response = server.get("/users").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(header_str(&response, "location"), Some("/login"));
}

#[tokio::test]
async fn anonymous_htmx_requests_get_hx_redirect() {
    let (server, _) = setup().await;
    let (name, value) = hx();
    let response = server
        .get("/users/toggle-amount-visibility")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(header_str(&response, "hx-redirect"), Some("/login"));
}

#[tokio::test]
async fn htmx_only_routes_reject_plain_requests() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = server
        .get("/users/toggle-amount-visibility")
        .add_header(header::COOKIE, cookie)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggling_amounts_flips_and_flashes() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    let first = server
        .get("/users/toggle-amount-visibility")
        .add_header(header::COOKIE, cookie.clone())
        .add_header(name.clone(), value.clone())
        .await;
    first.assert_status_ok();
    assert_eq!(header_str(&first, "hx-trigger"), Some("updated"));
    let body: Value = first.json();
    assert_eq!(body["enabled"], true);
    assert_eq!(body["message"], "Transaction amounts are now hidden");

    let second: Value = server
        .get("/users/toggle-amount-visibility")
        .add_header(header::COOKIE, cookie.clone())
        .add_header(name, value)
        .await
        .json();
    assert_eq!(second["message"], "Transaction amounts are now displayed");

    let messages: Value = server
        .get("/messages")
        .add_header(header::COOKIE, cookie.clone())
        .await
        .json();
    assert_eq!(messages.as_array().unwrap().len(), 2);
    assert_eq!(messages[0]["level"], "info");

    let drained: Value = server
        .get("/messages")
        .add_header(header::COOKIE, cookie)
        .await
        .json();
    assert!(drained.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn toggling_sound_reports_muted() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    let body: Value = server
        .get("/users/toggle-sound-playing")
        .add_header(header::COOKIE, cookie)
        .add_header(name, value)
        .await
        .json();
    assert_eq!(body["enabled"], true);
    assert_eq!(body["message"], "Sounds are now muted");
}

#[tokio::test]
async fn settings_update_refreshes_and_changes_start_page() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    let page: Value = server
        .get("/users/settings")
        .add_header(header::COOKIE, cookie.clone())
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(page["settings"]["start_page"], "MONTHLY");
    assert_eq!(page["start_pages"].as_array().unwrap().len(), 7);

    let response = server
        .post("/users/settings")
        .add_header(header::COOKIE, cookie.clone())
        .add_header(name, value)
        .form(&[
            ("start_page", "CALENDAR"),
            ("timezone", "Europe/Berlin"),
            ("language", "de"),
        ])
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(header_str(&response, "hx-refresh"), Some("true"));

    let index = server.get("/").add_header(header::COOKIE, cookie).await;
    assert_eq!(header_str(&index, "location"), Some("/calendar/"));
}

#[tokio::test]
async fn settings_update_rejects_unknown_timezone() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    let response = server
        .post("/users/settings")
        .add_header(header::COOKIE, cookie)
        .add_header(name, value)
        .form(&[
            ("start_page", "MONTHLY"),
            ("timezone", "Mars/Olympus"),
            ("language", "en"),
        ])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn theme_and_sidebar_toggles_return_no_content() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    server
        .get("/users/toggle-theme")
        .add_header(header::COOKIE, cookie.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get("/users/toggle-sidebar")
        .add_header(header::COOKIE, cookie)
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn superuser_adds_and_edits_users() {
    let (server, state) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    let added = server
        .post("/users/add")
        .add_header(header::COOKIE, cookie.clone())
        .add_header(name.clone(), value.clone())
        .form(&[
            ("email", "member@example.com"),
            ("first_name", "Mem"),
            ("password", "member password"),
        ])
        .await;
    added.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(
        header_str(&added, "hx-trigger"),
        Some("updated, hide_offcanvas")
    );

    let users: Value = server
        .get("/users")
        .add_header(header::COOKIE, cookie.clone())
        .await
        .json();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    let member_id = users[1]["id"].as_i64().unwrap();

    let edited = server
        .post(&format!("/users/{member_id}/edit"))
        .add_header(header::COOKIE, cookie.clone())
        .add_header(name, value)
        .form(&[
            ("email", "member@example.com"),
            ("first_name", "Member"),
            ("new_password", ""),
        ])
        .await;
    edited.assert_status(StatusCode::NO_CONTENT);

    let admin = state
        .users
        .create_superuser(NewUserRequest {
            email: ADMIN_EMAIL.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: ADMIN_PASSWORD.to_string(),
            is_superuser: true,
        })
        .await;
    assert!(admin.is_err(), "duplicate email must be rejected");

    let messages: Value = server
        .get("/messages")
        .add_header(header::COOKIE, cookie)
        .await
        .json();
    assert_eq!(messages[0]["text"], "Item added successfully");
    assert_eq!(messages[1]["text"], "Item updated successfully");
}

#[tokio::test]
async fn add_user_form_is_for_superusers_only() {
    let (server, _) = setup().await;
    let admin_cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    let form: Value = server
        .get("/users/add")
        .add_header(header::COOKIE, admin_cookie.clone())
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(form["action"], "/users/add");
    let fields: Vec<&str> = form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        ["email", "first_name", "last_name", "password", "is_superuser"]
    );

    server
        .get("/users/add")
        .add_header(header::COOKIE, admin_cookie.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/users/add")
        .add_header(header::COOKIE, admin_cookie)
        .add_header(name.clone(), value.clone())
        .form(&[
            ("email", "member@example.com"),
            ("password", "member password"),
        ])
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let member_cookie = login(&server, "member@example.com", "member password").await;
    server
        .get("/users/add")
        .add_header(header::COOKIE, member_cookie)
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn regular_users_cannot_list_or_edit_others() {
    let (server, _) = setup().await;
    let admin_cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();

    server
        .post("/users/add")
        .add_header(header::COOKIE, admin_cookie)
        .add_header(name.clone(), value.clone())
        .form(&[
            ("email", "member@example.com"),
            ("password", "member password"),
        ])
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let member_cookie = login(&server, "member@example.com", "member password").await;
    server
        .get("/users")
        .add_header(header::COOKIE, member_cookie.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .get("/users/1/edit")
        .add_header(header::COOKIE, member_cookie.clone())
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .get("/users/999/edit")
        .add_header(header::COOKIE, member_cookie)
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = server
        .get("/logout")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert!(
        header_str(&response, "set-cookie")
            .unwrap()
            .contains("Max-Age=0")
    );

    let after = server.get("/users").add_header(header::COOKIE, cookie).await;
    assert_eq!(header_str(&after, "location"), Some("/login"));
}

#[tokio::test]
async fn login_page_lists_password_form_by_default() {
    let (server, _) = setup().await;
    let body: Value = server.get("/login").await.json();
    assert_eq!(body["password_login"], true);
    assert!(body["providers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn logged_in_users_skip_the_login_page() {
    let (server, _) = setup().await;
    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = server.get("/login").add_header(header::COOKIE, cookie).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(header_str(&response, "location"), Some("/"));

    let stale = server
        .get("/login")
        .add_header(header::COOKIE, HeaderValue::from_static("sessionid=gone"))
        .await;
    stale.assert_status_ok();
}

#[tokio::test]
async fn oidc_only_login_redirects_to_provider() {
    let mut config = memory_config();
    config.auth.oidc_only = true;
    config.auth.providers.push(AuthProviderConfig {
        id: "keycloak".to_string(),
        name: "Keycloak".to_string(),
        server_url: "https://sso.example.com/realms/main".to_string(),
        client_id: "spendbook".to_string(),
        client_secret: None,
    });
    let (server, _) = setup_with(config, EnvSnapshot::default()).await;

    let response = server.get("/login").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        header_str(&response, "location"),
        Some("https://sso.example.com/realms/main")
    );

    server
        .post("/login")
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn system_checks_report_findings_as_json() {
    let env = EnvSnapshot::from_pairs([("SQL_DATABASE", "spendbook"), ("INTERNAL_PORT", "80x")]);
    let (server, _) = setup_with(memory_config(), env).await;

    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let report: Value = server
        .get("/v1/system/checks")
        .add_header(header::COOKIE, cookie)
        .await
        .json();
    assert_eq!(report["blocking"], true);
    assert_eq!(report["counts"]["error"], 2);
    assert_eq!(report["findings"][0]["code"], "APP.E001");
    assert_eq!(report["findings"][0]["variable"], "SECRET_KEY");
    assert_eq!(report["findings"][1]["code"], "APP.E002");
}

#[tokio::test]
async fn system_checks_are_clean_for_a_complete_environment() {
    let env = EnvSnapshot::from_pairs([("SECRET_KEY", "s3cret"), ("SQL_DATABASE", "spendbook")]);
    let (server, _) = setup_with(memory_config(), env).await;

    let cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let report: Value = server
        .get("/v1/system/checks")
        .add_header(header::COOKIE, cookie)
        .await
        .json();
    assert_eq!(report["blocking"], false);
    assert!(report["findings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn system_checks_require_a_superuser() {
    let (server, _) = setup().await;

    let anonymous = server.get("/v1/system/checks").await;
    anonymous.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(header_str(&anonymous, "location"), Some("/login"));

    let admin_cookie = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (name, value) = hx();
    server
        .post("/users/add")
        .add_header(header::COOKIE, admin_cookie)
        .add_header(name, value)
        .form(&[
            ("email", "member@example.com"),
            ("password", "member password"),
        ])
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let member_cookie = login(&server, "member@example.com", "member password").await;
    server
        .get("/v1/system/checks")
        .add_header(header::COOKIE, member_cookie)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

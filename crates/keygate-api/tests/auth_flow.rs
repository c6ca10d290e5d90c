//! 인메모리 저장소에 대한 end-to-end 인증 플로우 테스트.
//!
//! 전체 라우터를 구성하고 가입 → 로그인 → 토큰 재발급 → 역할 보호
//! 라우트 접근까지의 시나리오를 검증합니다.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use keygate_api::auth::{hash_password, TokenCodec};
use keygate_api::routes::create_api_router;
use keygate_api::state::AppState;
use keygate_core::{Role, UserRecord};

const TEST_SECRET: &str = "integration-test-secret-key-minimum-32-chars";

fn test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::in_memory(TokenCodec::new(TEST_SECRET, 60)));
    (create_api_router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn register_john(app: &Router) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        Some(json!({
            "email": "john.doe@example.com",
            "password": "MySecure123",
            "fullName": "John Doe"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_register_login_check_status_and_role_denial() {
    let (app, _state) = test_app();

    // 가입: 기본 역할 user, 활성 상태
    let registered = register_john(&app).await;
    assert_eq!(registered["email"], "john.doe@example.com");
    assert_eq!(registered["fullName"], "John Doe");
    assert_eq!(registered["isActive"], true);
    assert_eq!(registered["roles"], json!(["user"]));
    assert!(registered["token"].is_string());
    // 비밀번호/해시는 응답에 없음
    assert!(registered.get("password").is_none());
    assert!(registered.get("passwordHash").is_none());

    // 로그인: 새 토큰 발급
    let (status, logged_in) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({
            "email": "john.doe@example.com",
            "password": "MySecure123"
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["id"], registered["id"]);
    let login_token = logged_in["token"].as_str().unwrap().to_string();

    // check-status: 같은 사용자에 대해 갱신된 토큰
    let (status, refreshed) = send(
        &app,
        Method::GET,
        "/auth/check-status",
        None,
        Some(&login_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["id"], registered["id"]);
    assert!(refreshed["token"].is_string());

    // admin 역할이 필요한 라우트: 403과 고정 메시지
    let user_id = registered["id"].as_str().unwrap();
    let (status, denied) = send(
        &app,
        Method::GET,
        &format!("/api/v1/users/{user_id}"),
        None,
        Some(&login_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(denied["message"], "User John Doe need a valid role: [admin]");
    assert_eq!(denied["statusCode"], 403);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let (app, _state) = test_app();
    register_john(&app).await;

    // 비밀번호와 이름이 달라도 같은 이메일이면 거부
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({
            "email": "John.Doe@Example.com",
            "password": "Different456",
            "fullName": "Johnny"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already registered"));
}

#[tokio::test]
async fn test_invalid_credentials_are_byte_identical() {
    let (app, _state) = test_app();
    register_john(&app).await;

    // 존재하는 계정 + 틀린 비밀번호
    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "john.doe@example.com", "password": "WrongPass1"})),
        None,
    )
    .await;

    // 존재하지 않는 이메일
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "nobody@example.com", "password": "MySecure123"})),
        None,
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // 응답 본문이 완전히 동일 - 이메일 등록 여부가 드러나지 않음
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Credentials are not valid (email)");
}

#[tokio::test]
async fn test_password_policy_violations_all_listed() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({
            "email": "jane@example.com",
            "password": "abc",
            "fullName": "Jane"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let messages = body["message"].as_array().unwrap();
    assert_eq!(messages.len(), 3);

    let joined = messages
        .iter()
        .map(|m| m.as_str().unwrap())
        .collect::<Vec<_>>()
        .join("; ");
    assert!(joined.contains("6 characters"));
    assert!(joined.contains("uppercase"));
    assert!(joined.contains("number"));
}

#[tokio::test]
async fn test_register_rejects_malformed_email_shape() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({
            "email": "not-an-email",
            "password": "MySecure123",
            "fullName": "Jane"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_array());
}

#[tokio::test]
async fn test_protected_route_rejects_bad_tokens() {
    let (app, _state) = test_app();
    let registered = register_john(&app).await;
    let user_id: Uuid = registered["id"].as_str().unwrap().parse().unwrap();

    // 토큰 없음
    let (status, body) = send(&app, Method::GET, "/auth/check-status", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not valid");

    // 형식이 잘못된 토큰
    let (status, body) = send(
        &app,
        Method::GET,
        "/auth/check-status",
        None,
        Some("garbage.token.here"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not valid");

    // 다른 시크릿으로 서명된 토큰
    let forged_codec = TokenCodec::new("another-secret-key-for-testing-32-chars!", 60);
    let forged = forged_codec
        .issue(&record_with_id(user_id, "john.doe@example.com", "John Doe"))
        .unwrap();
    let (status, body) = send(&app, Method::GET, "/auth/check-status", None, Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not valid");

    // 만료된 토큰 (같은 시크릿, 과거 만료)
    let expired_codec = TokenCodec::new(TEST_SECRET, -5);
    let expired = expired_codec
        .issue(&record_with_id(user_id, "john.doe@example.com", "John Doe"))
        .unwrap();
    let (status, body) = send(
        &app,
        Method::GET,
        "/auth/check-status",
        None,
        Some(&expired),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not valid");

    // 유효한 토큰이지만 저장소에 없는 주체
    let valid_codec = TokenCodec::new(TEST_SECRET, 60);
    let unknown_subject = valid_codec
        .issue(&record_with_id(Uuid::new_v4(), "ghost@example.com", "Ghost"))
        .unwrap();
    let (status, body) = send(
        &app,
        Method::GET,
        "/auth/check-status",
        None,
        Some(&unknown_subject),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not valid");
}

#[tokio::test]
async fn test_admin_can_read_users() {
    let (app, state) = test_app();
    let registered = register_john(&app).await;
    let john_id = registered["id"].as_str().unwrap();

    // admin 사용자를 저장소에 직접 시드
    let digest = hash_password("AdminPass1").unwrap();
    let mut admin = UserRecord::new("admin@example.com", digest, "Admin");
    admin.roles = vec![Role::Admin];
    state.auth.store().insert(&admin).await.unwrap();

    let admin_token = state.auth.tokens().issue(&admin).unwrap();

    // admin은 다른 사용자의 레코드를 조회할 수 있음
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/users/{john_id}"),
        None,
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "john.doe@example.com");
    assert_eq!(body["roles"], json!(["user"]));
    assert!(body.get("passwordHash").is_none());

    // 존재하지 않는 사용자는 404
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/users/{}", Uuid::new_v4()),
        None,
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inactive_principal_rejected_by_pipeline() {
    let (app, state) = test_app();

    // 활성 상태로 시드 후 토큰 발급, 이후 비활성으로 교체된 상황을 재현
    let digest = hash_password("MySecure123").unwrap();
    let mut user = UserRecord::new("dormant@example.com", digest, "Dormant");
    user.is_active = false;
    state.auth.store().insert(&user).await.unwrap();

    let token = state.auth.tokens().issue(&user).unwrap();

    let (status, body) = send(&app, Method::GET, "/auth/check-status", None, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token not valid");
}

fn record_with_id(id: Uuid, email: &str, full_name: &str) -> UserRecord {
    let mut record = UserRecord::new(email, "unused-digest", full_name);
    record.id = id;
    record
}

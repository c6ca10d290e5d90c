//! 인증 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /auth/register` - 가입 후 즉시 로그인
//! - `POST /auth/login` - 자격증명 로그인
//! - `GET  /auth/check-status` - 토큰 재발급 (bearer 토큰 필요)
//!
//! 요청/응답 본문은 호환성을 위해 camelCase를 사용합니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use keygate_core::Role;

use crate::auth::{authenticate, AuthSession, CurrentUser, ANY_AUTHENTICATED};
use crate::error::ErrorBody;
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 이메일 (로그인 키)
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    /// 평문 비밀번호 - 정책 검사는 코어에서 수행
    pub password: String,
    /// 표시 이름
    #[validate(length(min = 1, message = "fullName must not be empty"))]
    pub full_name: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// 이메일
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    /// 평문 비밀번호
    pub password: String,
}

/// 주체 + 새로 발급된 토큰.
///
/// 비밀번호 해시는 이 타입에 존재하지 않으므로 응답에 실릴 수 없습니다.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// 사용자 ID
    pub id: Uuid,
    /// 이메일
    pub email: String,
    /// 표시 이름
    pub full_name: String,
    /// 활성 여부
    pub is_active: bool,
    /// 역할 집합
    pub roles: Vec<Role>,
    /// bearer 토큰
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            id: session.user.id,
            email: session.user.email,
            full_name: session.user.full_name,
            is_active: session.user.is_active,
            roles: session.user.roles,
            token: session.token,
        }
    }
}

// ==================== 핸들러 ====================

/// validator 에러를 메시지 목록으로 수집.
fn shape_errors(errors: &validator::ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| err.code.to_string())
        })
        .collect()
}

/// 가입 처리.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 완료, 주체와 토큰 반환", body = AuthResponse),
        (status = 400, description = "형식 위반 또는 중복 이메일", body = ErrorBody),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return ErrorBody::with_messages(StatusCode::BAD_REQUEST, shape_errors(&errors))
            .into_response();
    }

    match state
        .auth
        .register(&payload.email, &payload.password, &payload.full_name)
        .await
    {
        Ok(session) => (StatusCode::CREATED, Json(AuthResponse::from(session))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// 로그인 처리.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 400, description = "형식 위반", body = ErrorBody),
        (status = 401, description = "자격증명 불일치", body = ErrorBody),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return ErrorBody::with_messages(StatusCode::BAD_REQUEST, shape_errors(&errors))
            .into_response();
    }

    match state.auth.login(&payload.email, &payload.password).await {
        Ok(session) => (StatusCode::OK, Json(AuthResponse::from(session))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// 토큰 재발급.
///
/// 인증 게이트를 통과한 주체에 대해 새 토큰을 발급합니다.
#[utoipa::path(
    get,
    path = "/auth/check-status",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "갱신된 주체와 토큰", body = AuthResponse),
        (status = 401, description = "토큰 누락/무효", body = ErrorBody),
    )
)]
pub async fn check_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match state.auth.check_status(user) {
        Ok(session) => (StatusCode::OK, Json(AuthResponse::from(session))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// 인증 라우터 생성.
///
/// check-status에만 인증 게이트를 끼우고(빈 역할 집합 = 인증만 요구),
/// 가입/로그인은 공개 라우트로 둡니다.
pub fn auth_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/check-status",
            get(check_status).layer(middleware::from_fn_with_state(
                (state.clone(), ANY_AUTHENTICATED),
                authenticate,
            )),
        )
        .with_state(state)
}

//! 사용자 조회 endpoint (관리용).
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/users/{id}` - 사용자 레코드 조회 (admin 역할 필요)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use keygate_core::{Role, UserRecord};

use crate::auth::authenticate;
use crate::error::ErrorBody;
use crate::state::AppState;

/// 사용자 레코드 조회가 허용되는 역할 집합.
const USER_LOOKUP_ROLES: &[Role] = &[Role::Admin];

/// 사용자 응답 (자격증명 재료 없음).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
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
    /// 생성 시간 (ISO 8601)
    pub created_at: String,
    /// 수정 시간 (ISO 8601)
    pub updated_at: String,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            roles: user.roles.clone(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// 사용자 단건 조회.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "사용자 레코드", body = UserResponse),
        (status = 401, description = "토큰 누락/무효", body = ErrorBody),
        (status = 403, description = "역할 부족", body = ErrorBody),
        (status = 404, description = "존재하지 않는 사용자", body = ErrorBody),
    )
)]
pub async fn get_user(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Response {
    match state.auth.store().find_by_id(id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(UserResponse::from(&user))).into_response(),
        Ok(None) => {
            ErrorBody::new(StatusCode::NOT_FOUND, format!("User {id} not found")).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// 사용자 라우터 생성.
///
/// 요구 역할 집합을 라우트 등록 시점에 값으로 전달합니다.
pub fn users_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/{id}",
            get(get_user).layer(middleware::from_fn_with_state(
                (state.clone(), USER_LOOKUP_ROLES),
                authenticate,
            )),
        )
        .with_state(state)
}

//! API 라우트.
//!
//! 모든 REST 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/auth/register` - 가입
//! - `/auth/login` - 로그인
//! - `/auth/check-status` - 토큰 재발급 (인증 필요)
//! - `/api/v1/users/{id}` - 사용자 조회 (admin 역할 필요)

pub mod auth;
pub mod health;
pub mod users;

pub use auth::{auth_router, AuthResponse, LoginRequest, RegisterRequest};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use users::{users_router, UserResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/health", health_router(state.clone()))
        .nest("/auth", auth_router(state.clone()))
        .nest("/api/v1/users", users_router(state))
}

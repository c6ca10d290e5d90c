//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다. 요청 간 공유되는
//! 가변 상태는 저장소뿐이며, 서명 키 재료는 시작 이후 불변입니다.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{AuthService, TokenCodec};
use crate::repository::{InMemoryUserStore, PgUserStore, UserStore};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 인증 오케스트레이터 (저장소 + 토큰 코덱)
    pub auth: AuthService,

    /// 데이터베이스 연결 풀 (Postgres 실행 시에만 존재)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// Postgres 저장소 기반 상태 생성.
    pub fn with_postgres(pool: PgPool, tokens: TokenCodec) -> Self {
        let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
        Self {
            auth: AuthService::new(store, tokens),
            db_pool: Some(pool),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 인메모리 저장소 기반 상태 생성 (개발/테스트용).
    pub fn in_memory(tokens: TokenCodec) -> Self {
        let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        Self {
            auth: AuthService::new(store, tokens),
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 인메모리 저장소와 고정 시크릿으로 생성합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::in_memory(TokenCodec::new(
        "test-secret-key-for-jwt-testing-minimum-32-chars",
        60,
    ))
}

//! 인증/인가 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 가입/로그인/토큰 재발급과 역할 보호 라우트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use keygate_api::auth::TokenCodec;
use keygate_api::openapi::swagger_ui_router;
use keygate_api::repository::PgUserStore;
use keygate_api::routes::create_api_router;
use keygate_api::state::AppState;
use keygate_core::logging::{init_logging, LogConfig};
use keygate_core::AppConfig;

/// JWT 서명 시크릿 로드.
///
/// `JWT_SECRET` 환경변수가 우선하며, 없으면 설정 파일 값을 사용합니다.
fn load_jwt_secret(config: &AppConfig) -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("JWT_SECRET not set, using configured secret (INSECURE for development only)");
            config.auth.jwt_secret.clone()
        }
    }
}

/// AppState 초기화.
///
/// `DATABASE_URL`이 설정되어 있으면 Postgres 저장소를, 아니면
/// 인메모리 저장소를 사용합니다.
async fn build_state(config: &AppConfig, tokens: TokenCodec) -> AppState {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        warn!("DATABASE_URL not set, using in-memory store (records do not survive restart)");
        return AppState::in_memory(tokens);
    };

    match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .connect(&database_url)
        .await
    {
        Ok(pool) => {
            let store = PgUserStore::new(pool.clone());
            if let Err(e) = store.ensure_schema().await {
                error!("Failed to prepare users schema: {}", e);
            }
            info!("Connected to Postgres");
            AppState::with_postgres(pool, tokens)
        }
        Err(e) => {
            error!(
                "Failed to connect to database: {}. Falling back to in-memory store",
                e
            );
            AppState::in_memory(tokens)
        }
    }
}

/// CORS 미들웨어 구성.
///
/// `CORS_ORIGINS` 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let (allow_origin, allow_credentials) = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                (AllowOrigin::any(), false)
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                (AllowOrigin::list(origins), true)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            (AllowOrigin::any(), false)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(allow_credentials)
        .max_age(Duration::from_secs(3600))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드
    let config = AppConfig::load_default()?;

    // tracing 초기화
    init_logging(
        LogConfig::new(&config.logging.level)
            .with_format(config.logging.format.parse().unwrap_or_default()),
    )
    .map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting Keygate API server...");

    // 서명 시크릿은 여기서 한 번 로드되어 이후 불변
    let jwt_secret = load_jwt_secret(&config);
    let tokens = TokenCodec::new(&jwt_secret, config.auth.token_ttl_minutes);

    // AppState 생성 (저장소 초기화 포함)
    let state = Arc::new(build_state(&config, tokens).await);

    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        token_ttl_minutes = config.auth.token_ttl_minutes,
        "Application state initialized"
    );

    // 라우터 생성
    let app = Router::new()
        .merge(create_api_router(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // 기타 미들웨어
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer());

    // 서버 시작
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료를 시작합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

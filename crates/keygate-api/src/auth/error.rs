//! 인증/인가 파이프라인의 타입화된 실패.
//!
//! 모든 실패는 값으로 반환되며, 파이프라인은 첫 실패에서 중단됩니다.
//! 사용자에게 노출되는 메시지는 호환성을 위해 고정되어 있습니다.
//! 특히 로그인 실패는 이메일 미등록/비밀번호 불일치/비활성 계정을
//! 구분하지 않습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use keygate_core::Role;

use crate::error::ErrorBody;

/// 인증/인가 에러.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// 이미 등록된 이메일로 가입 시도
    #[error("Email {0} is already registered")]
    DuplicateEmail(String),

    /// 비밀번호 정책 위반 - 위반된 규칙 전체를 담습니다
    #[error("password does not meet the account policy")]
    InvalidPasswordFormat(Vec<String>),

    /// 로그인 실패 - 원인(이메일/비밀번호/비활성)을 구분하지 않습니다
    #[error("Credentials are not valid (email)")]
    InvalidCredentials,

    /// 토큰 누락/변조/만료, 또는 주체를 활성 사용자로 해석할 수 없음
    #[error("Token not valid")]
    Unauthenticated,

    /// 역할 불일치
    #[error("User {} need a valid role: [{}]", .full_name, join_roles(.required))]
    Forbidden {
        /// 주체의 표시 이름
        full_name: String,
        /// 작업이 요구한 역할 집합
        required: Vec<Role>,
    },

    /// 저장소 장애
    #[error("storage error: {0}")]
    Store(String),

    /// 비밀번호 해싱 실패
    #[error("password hashing failed")]
    Hash,

    /// 토큰 서명 실패
    #[error("token signing failed")]
    Token,
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

impl AuthError {
    /// 이 에러가 매핑되는 HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateEmail(_) | AuthError::InvalidPasswordFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::Store(_) | AuthError::Hash | AuthError::Token => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AuthError::InvalidPasswordFormat(violations) => {
                ErrorBody::with_messages(status, violations.clone())
            }
            // 내부 장애는 상세를 응답에 싣지 않음
            AuthError::Store(_) | AuthError::Hash | AuthError::Token => {
                tracing::error!(error = %self, "internal auth failure");
                ErrorBody::new(status, "Internal server error")
            }
            _ => ErrorBody::new(status, self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

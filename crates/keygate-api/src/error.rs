//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! `message`는 단일 문자열이거나, 검증 실패의 경우 문자열 배열입니다.
//!
//! # 예시
//!
//! ```json
//! {
//!   "message": "Token not valid",
//!   "error": "Unauthorized",
//!   "statusCode": 401
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 에러 메시지 - 단일 문자열 또는 검증 실패 목록.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorMessage {
    /// 단일 메시지
    Single(String),
    /// 위반된 규칙 목록 (검증 실패)
    Many(Vec<String>),
}

/// 통합 API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// 사람이 읽을 수 있는 메시지 (검증 실패 시 배열)
    pub message: ErrorMessage,
    /// HTTP reason phrase (예: "Unauthorized")
    pub error: String,
    /// HTTP 상태 코드
    pub status_code: u16,
}

impl ErrorBody {
    /// 단일 메시지 에러 본문 생성.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: ErrorMessage::Single(message.into()),
            error: reason(status),
            status_code: status.as_u16(),
        }
    }

    /// 메시지 목록을 담는 에러 본문 생성 (검증 실패용).
    pub fn with_messages(status: StatusCode, messages: Vec<String>) -> Self {
        Self {
            message: ErrorMessage::Many(messages),
            error: reason(status),
            status_code: status.as_u16(),
        }
    }
}

fn reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Error").to_string()
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_message_serialization() {
        let body = ErrorBody::new(StatusCode::UNAUTHORIZED, "Token not valid");
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains(r#""message":"Token not valid""#));
        assert!(json.contains(r#""error":"Unauthorized""#));
        assert!(json.contains(r#""statusCode":401"#));
    }

    #[test]
    fn test_message_list_serialization() {
        let body = ErrorBody::with_messages(
            StatusCode::BAD_REQUEST,
            vec!["rule one".to_string(), "rule two".to_string()],
        );
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains(r#""message":["rule one","rule two"]"#));
        assert!(json.contains(r#""error":"Bad Request""#));
        assert!(json.contains(r#""statusCode":400"#));
    }

    #[test]
    fn test_into_response_status() {
        let response = ErrorBody::new(StatusCode::FORBIDDEN, "nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

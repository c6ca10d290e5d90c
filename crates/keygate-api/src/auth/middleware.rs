//! 보호된 라우트의 요청 게이트.
//!
//! 라우트 등록 시점에 요구 역할 집합을 평범한 값으로 전달받아
//! 레이어로 끼워 넣습니다:
//!
//! ```rust,ignore
//! .route(
//!     "/check-status",
//!     get(check_status).layer(middleware::from_fn_with_state(
//!         (state.clone(), ANY_AUTHENTICATED),
//!         authenticate,
//!     )),
//! )
//! ```
//!
//! 빈 역할 집합은 "인증된 주체 누구나", 레이어를 생략하면 공개
//! 라우트입니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use keygate_core::{Role, UserRecord};

use super::error::AuthError;
use super::guard;
use crate::state::AppState;

/// 인증된 주체 누구나 허용하는 요구 집합.
pub const ANY_AUTHENTICATED: &[Role] = &[];

/// [`authenticate`]가 요청에 부착하는 인증된 사용자.
#[derive(Debug, Clone)]
pub struct Principal(pub UserRecord);

/// 보호된 핸들러 앞에서 실행되는 게이트.
///
/// bearer 토큰 검증 → 저장소에서 주체 해석 → 역할 검사 순서로
/// 진행하며, 첫 실패에서 즉시 중단합니다. 주체가 조회되지 않거나
/// 비활성이면 토큰 실패와 동일하게 처리됩니다.
pub async fn authenticate(
    State((state, required)): State<(Arc<AppState>, &'static [Role])>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?;
    let claims = state.auth.tokens().verify(token)?;

    let user = state
        .auth
        .store()
        .find_by_id(claims.sub)
        .await?
        .filter(|user| user.is_active)
        .ok_or(AuthError::Unauthenticated)?;

    guard::check_roles(required, Some(&user))?;

    request.extensions_mut().insert(Principal(user));
    Ok(next.run(request).await)
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::Unauthenticated)
}

/// [`authenticate`]가 부착한 주체를 꺼내는 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn check_status(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .map(|principal| CurrentUser(principal.0.clone()))
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::Unauthenticated)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(bearer_token(&headers).is_err());

        // 접두사만 있고 구분자가 없는 경우
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearerabc"));
        assert!(bearer_token(&headers).is_err());
    }
}

//! 역할 기반 접근 결정.
//!
//! 상태 기계: {Unchecked} → (토큰 검증) → {Authenticated} →
//! (역할 교집합 검사) → {Allowed | Denied}. 거부되면 보호된 작업은
//! 실행되지 않습니다.

use keygate_core::{Role, UserRecord};

use super::error::AuthError;

/// 주체가 `required`로 보호된 작업을 수행할 수 있는지 결정합니다.
///
/// - 주체가 해석되지 않았으면 요구 집합과 무관하게 거부합니다.
/// - `required`가 비어 있으면 인증된 주체 누구나 허용됩니다.
/// - 주체의 역할 집합과 요구 집합의 교집합이 비어 있지 않으면 허용됩니다.
/// - 그 외에는 주체의 표시 이름과 요구 역할을 담아 거부합니다.
pub fn check_roles(required: &[Role], principal: Option<&UserRecord>) -> Result<(), AuthError> {
    let Some(user) = principal else {
        return Err(AuthError::Unauthenticated);
    };

    if required.is_empty() {
        return Ok(());
    }

    if user.has_any_role(required) {
        return Ok(());
    }

    Err(AuthError::Forbidden {
        full_name: user.full_name.clone(),
        required: required.to_vec(),
    })
}

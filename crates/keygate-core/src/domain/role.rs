//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할 정의. 역할 간 계층은 없으며, 보호된 작업은
//! 허용 역할 집합을 명시적으로 선언합니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 닫힌 집합이며 계층이 없습니다. `Admin`이 `SuperUser`를 포함하지 않으며,
/// 각 작업은 허용되는 역할 집합을 직접 선언합니다. 주체(principal)는
/// 자신의 역할 집합이 요구 집합과 교집합을 가지면 통과합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Role {
    /// 일반 사용자 - 가입 시 기본 역할
    User,
    /// 관리자
    Admin,
    /// 슈퍼 유저
    SuperUser,
}

impl Role {
    /// 와이어 표현 반환 (`user`, `admin`, `superUser`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperUser => "superUser",
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "superUser" => Some(Role::SuperUser),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

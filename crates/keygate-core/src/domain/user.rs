//! 사용자 레코드.
//!
//! 저장소에 영속되는 사용자 레코드와 이메일 정규화 규칙을 정의합니다.
//! 인증을 통과한 요청에는 이 레코드가 principal로 부착됩니다.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Role;

/// 이메일을 로그인 키로 정규화합니다.
///
/// 앞뒤 공백을 제거하고 소문자로 변환합니다. 저장소 조회와 삽입은
/// 항상 정규화된 이메일로 수행됩니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 영속되는 사용자 레코드.
///
/// `password_hash`는 PHC 형식의 Argon2 해시이며 평문은 어디에도
/// 저장되지 않습니다. 응답 직렬화는 별도 DTO를 통해서만 이루어집니다.
#[derive(Clone)]
pub struct UserRecord {
    /// 사용자 ID
    pub id: Uuid,
    /// 정규화된 이메일 (로그인 키, 유일)
    pub email: String,
    /// PHC 형식 비밀번호 해시
    pub password_hash: String,
    /// 표시 이름
    pub full_name: String,
    /// 비활성 계정은 인증 단계에서 거부됩니다
    pub is_active: bool,
    /// 역할 집합 (생성 시 최소 기본 역할 포함, 순서 무관)
    pub roles: Vec<Role>,
    /// 생성 시간
    pub created_at: DateTime<Utc>,
    /// 수정 시간
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// 새 사용자 레코드 생성.
    ///
    /// 기본 역할 `user`와 활성 상태로 생성됩니다. 이메일은 정규화되어
    /// 저장됩니다.
    pub fn new(
        email: impl AsRef<str>,
        password_hash: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email.as_ref()),
            password_hash: password_hash.into(),
            full_name: full_name.into(),
            is_active: true,
            roles: vec![Role::User],
            created_at: now,
            updated_at: now,
        }
    }

    /// 요구 역할 집합과 교집합이 있는지 확인.
    pub fn has_any_role(&self, required: &[Role]) -> bool {
        self.roles.iter().any(|role| required.contains(role))
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("is_active", &self.is_active)
            .field("roles", &self.roles)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

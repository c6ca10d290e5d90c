//! 사용자 저장소 계약.

use async_trait::async_trait;
use keygate_core::UserRecord;
use uuid::Uuid;

use crate::auth::AuthError;

/// 인증 파이프라인이 의존하는 저장소 계약.
///
/// 구현은 이메일 중복 검사와 삽입을 직렬화해야 합니다. 동시 가입
/// 경합에서도 같은 이메일에 대한 `insert`는 정확히 한 번만 성공하고
/// 나머지는 [`AuthError::DuplicateEmail`]로 실패합니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 정규화된 이메일로 조회.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;

    /// ID로 조회.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError>;

    /// 새 레코드 영속화.
    ///
    /// 저장소가 이미 같은 이메일을 보유하면 [`AuthError::DuplicateEmail`].
    async fn insert(&self, user: &UserRecord) -> Result<(), AuthError>;
}

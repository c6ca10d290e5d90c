//! 인메모리 사용자 저장소.
//!
//! 테스트 및 `DATABASE_URL` 없이 실행되는 개발 모드용. 쓰기 락이
//! 중복 이메일 검사와 삽입을 직렬화합니다.

use std::collections::HashMap;

use async_trait::async_trait;
use keygate_core::{normalize_email, UserRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::users::UserStore;
use crate::auth::AuthError;

/// HashMap 기반 저장소.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 저장된 레코드 수.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let needle = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == needle).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn insert(&self, user: &UserRecord) -> Result<(), AuthError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == user.email) {
            return Err(AuthError::DuplicateEmail(user.email.clone()));
        }

        users.insert(user.id, user.clone());
        Ok(())
    }
}

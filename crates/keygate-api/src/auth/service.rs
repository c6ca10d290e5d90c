//! 인증 서비스.
//!
//! 가입, 로그인, 토큰 재발급을 오케스트레이션합니다. 저장소와 토큰
//! 코덱을 조합하며, 실패 시 어떤 부수효과도 남기지 않습니다 - 가입
//! 검증이 실패하면 토큰은 발급되지 않습니다.

use std::sync::Arc;

use tracing::info;

use keygate_core::{check_password_policy, normalize_email, UserRecord};

use super::error::AuthError;
use super::jwt::TokenCodec;
use super::password;
use crate::repository::UserStore;

/// 주체와 그에 대해 발급된 bearer 토큰.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// 인증된 사용자 레코드
    pub user: UserRecord,
    /// 발급된 토큰
    pub token: String,
}

/// 가입/로그인/상태 갱신 오케스트레이터.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl AuthService {
    /// 새 서비스 생성.
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { store, tokens }
    }

    /// 계정을 생성하고 로그인 상태로 반환합니다.
    ///
    /// 1. 이메일 정규화 후 중복 검사
    /// 2. 비밀번호 정책 검사 (위반 규칙 전체 보고)
    /// 3. 해싱 후 기본 역할 `user`, 활성 상태로 영속화
    /// 4. 토큰 발급
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail(email));
        }

        let violations = check_password_policy(password);
        if !violations.is_empty() {
            return Err(AuthError::InvalidPasswordFormat(violations));
        }

        let digest = password::hash_password(password)?;
        let user = UserRecord::new(&email, digest, full_name);

        // 삽입이 유일성을 다시 원자적으로 검사 - 동시 가입 경합은
        // 여기서 DuplicateEmail로 드러남
        self.store.insert(&user).await?;
        info!(user_id = %user.id, "user registered");

        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// 자격증명을 검증하고 토큰을 발급합니다.
    ///
    /// 미등록 이메일, 비밀번호 불일치, 비활성 계정은 모두 같은
    /// [`AuthError::InvalidCredentials`]로 실패합니다 - 계정 존재 여부를
    /// 응답으로 구분할 수 없습니다.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "login succeeded");
        Ok(AuthSession { user, token })
    }

    /// 이미 인증을 통과한 주체에 대해 새 토큰을 재발급합니다.
    ///
    /// 자격증명 재검사는 하지 않습니다 - 신뢰는 호출자가 토큰 검증을
    /// 통과했다는 사실에서 상속됩니다.
    pub fn check_status(&self, user: UserRecord) -> Result<AuthSession, AuthError> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// 저장소 참조.
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// 토큰 코덱 참조.
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }
}

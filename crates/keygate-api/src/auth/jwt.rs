//! JWT 토큰 처리.
//!
//! Bearer 토큰 발급 및 검증. 토큰은 무상태(stateless)이며 서버 측
//! 폐기 저장소는 없습니다. 재발급은 새 만료 시간을 가진 새 토큰을
//! 만들 뿐, 기존 토큰을 자연 만료 이전에 무효화하지 않습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use keygate_core::UserRecord;

use super::error::AuthError;

/// JWT 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: Uuid,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    pub jti: Uuid,
}

/// 토큰 서명/검증기.
///
/// 키 재료는 프로세스 시작 시 설정에서 한 번 구성되며 이후 불변입니다.
/// 검증은 토큰 + 키 + 현재 시간의 순수 함수입니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    /// 새 코덱 생성.
    ///
    /// # Arguments
    ///
    /// * `secret` - HS256 서명 시크릿
    /// * `ttl_minutes` - 발급되는 토큰의 만료 시간 (분)
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
            validation,
        }
    }

    /// 주체에 대한 새 토큰 발급.
    pub fn issue(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::Token)
    }

    /// 토큰 디코딩 및 검증.
    ///
    /// 잘못된 인코딩, 서명 불일치, 만료를 모두 같은 에러로 처리합니다.
    /// 호출자는 어느 경우였는지 알 수 없습니다.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::Unauthenticated)
    }
}

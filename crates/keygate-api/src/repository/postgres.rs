//! Postgres 사용자 저장소.
//!
//! `users` 테이블의 이메일 유니크 인덱스가 중복 가입 경합을 DB 수준에서
//! 직렬화합니다. 유니크 위반은 [`AuthError::DuplicateEmail`]로 변환됩니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use keygate_core::{normalize_email, Role, UserRecord};

use super::users::UserStore;
use crate::auth::AuthError;

/// users 테이블 스키마. 시작 시 적용되며, 이미 존재하면 no-op.
const USERS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    roles TEXT[] NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)
"#;

/// DB에서 조회한 user row.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    is_active: bool,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> UserRecord {
        UserRecord {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            is_active: self.is_active,
            roles: self
                .roles
                .iter()
                .filter_map(|role| Role::parse(role))
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PgPool 기반 저장소.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// 새 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// users 테이블이 없으면 생성합니다.
    pub async fn ensure_schema(&self) -> Result<(), AuthError> {
        sqlx::query(USERS_SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, full_name, is_active, roles, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(row.map(UserRow::into_record))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, full_name, is_active, roles, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(row.map(UserRow::into_record))
    }

    async fn insert(&self, user: &UserRecord) -> Result<(), AuthError> {
        let roles: Vec<String> = user
            .roles
            .iter()
            .map(|role| role.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, full_name, is_active, roles, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.is_active)
        .bind(&roles)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AuthError::DuplicateEmail(user.email.clone())
            }
            _ => AuthError::Store(e.to_string()),
        })?;

        Ok(())
    }
}

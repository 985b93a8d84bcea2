//! # 로그인 세션 데이터베이스 쿼리 모듈
//!
//! ## 세션 라이프사이클
//! ```text
//! [로그인] insert_session() → 유효(expires_at > now) → delete_session() → [로그아웃]
//!                                   └→ 만료 → 조회 시 또는 purge 시 삭제
//! ```
//!
//! 토큰 원문은 DB에 저장하지 않습니다. `token_hash`(SHA-256)만 저장하므로
//! DB가 유출되어도 쿠키를 위조할 수 없습니다.

use crate::error::AppError;
use crate::models::Session;
use sqlx::SqlitePool;

/// 새 세션 행을 저장합니다.
pub async fn insert_session(
    pool: &SqlitePool,
    token_hash: &str,
    user_id: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token_hash, user_id, expires_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(token_hash)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 토큰 해시로 세션을 조회합니다. 만료 여부는 호출하는 쪽에서 판단합니다.
pub async fn find_session(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<Session>, AppError> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT token_hash, user_id, created_at, expires_at
        FROM sessions
        WHERE token_hash = ?
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// 세션 하나를 삭제합니다. 삭제된 행이 있으면 true
pub async fn delete_session(pool: &SqlitePool, token_hash: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// `now` 이전에 만료된 모든 세션을 삭제하고 삭제된 행 수를 반환합니다.
pub async fn delete_expired_sessions(pool: &SqlitePool, now: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

//! # 소유권 검사 (Ownership Guard)
//!
//! 여행과 그 하위 활동을 변경하는 모든 작업은 먼저 이 검사를 통과해야 합니다.
//!
//! 검사 순서:
//! 1. 익명 요청 → `Unauthorized` (401)
//! 2. 여행 없음 → `NotFound` (404)
//! 3. 소유자가 아님 → `Forbidden` (403)
//! 4. 그 외 → 허용
//!
//! `Forbidden`을 `NotFound`로 숨기지 않습니다. 모든 경로에서 같은 정책을 씁니다.

use crate::error::AppError;
use crate::models::Identity;
use sqlx::SqliteExecutor;

/// 여행 변경 권한을 검사합니다.
///
/// 실행기(executor)를 제네릭으로 받으므로 풀(`&SqlitePool`)이나
/// 트랜잭션 연결(`&mut *tx`) 모두 넘길 수 있습니다.
/// 트랜잭션 안에서 호출하면 검사와 변경 사이에 소유자가 바뀌는 일이 없습니다.
pub async fn authorize_trip_mutation<'e, E>(
    executor: E,
    trip_id: &str,
    identity: &Identity,
) -> Result<(), AppError>
where
    E: SqliteExecutor<'e>,
{
    let requester_id = identity
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("Sign in required".to_string()))?;

    let owner_id: Option<String> = sqlx::query_scalar("SELECT user_id FROM trips WHERE id = ?")
        .bind(trip_id)
        .fetch_optional(executor)
        .await?;

    match owner_id {
        None => Err(AppError::NotFound),
        Some(owner_id) if owner_id != requester_id => {
            tracing::debug!(trip_id, requester_id, "trip mutation rejected: not the owner");
            Err(AppError::Forbidden)
        }
        Some(_) => Ok(()),
    }
}

//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `activities`: 일별 활동 CRUD (부모 여행의 소유자 검사 포함)
//! - `sessions`: 로그인 세션 저장/조회/폐기
//! - `trips`: 여행 CRUD (삭제 시 활동까지 한 트랜잭션으로 삭제)
//! - `users`: 사용자 계정 쿼리

pub mod activities;
pub mod sessions;
pub mod trips;
pub mod users;

pub use activities::*;
pub use trips::*;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// DB에 저장하는 타임스탬프 형식. SQLite의 `strftime('%Y-%m-%dT%H:%M:%fZ')` 기본값과 같습니다.
/// 고정 길이 문자열이므로 문자열 비교가 곧 시간 비교입니다.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// 연결 풀을 만들고 마이그레이션을 실행합니다.
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 1개로 제한합니다.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

/// 쓰기 트랜잭션을 `BEGIN IMMEDIATE`로 엽니다.
///
/// 변경 함수는 소유권 검사(읽기) 뒤에 쓰므로 시작부터 쓰기 잠금을 잡아야 합니다.
/// DEFERRED로 열면 동시 요청끼리 잠금 승격에 실패해 곧바로 `database is locked`가 납니다.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

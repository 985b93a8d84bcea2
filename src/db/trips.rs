//! # 여행(Trip) 데이터베이스 쿼리 모듈
//!
//! `trips` 테이블의 CRUD 쿼리 함수들입니다.
//! 조회 함수는 여행마다 `daily_activities`를 날짜순(같은 날짜는 생성순)으로 채워서 반환합니다.
//!
//! 변경 함수(`update_trip`, `delete_trip`)는 트랜잭션을 열고 그 안에서
//! 소유권 검사 → 변경 → 커밋 순서로 실행합니다.

use std::collections::HashMap;

use crate::db::activities::{list_activities, ACTIVITY_COLUMNS};
use crate::db::begin_write;
use crate::error::AppError;
use crate::models::*;
use crate::services::ownership::authorize_trip_mutation;
use crate::services::validation::{format_date, parse_calendar_date};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

const TRIP_COLUMNS: &str = "id, user_id, title, description, start_date, end_date, location, \
     tags, image_url, general_description, created_at, updated_at";

/// 활동 목록 없이 여행 한 행만 조회합니다.
pub async fn fetch_trip_row<'e, E>(executor: E, id: &str) -> Result<Option<Trip>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let trip = sqlx::query_as::<_, Trip>(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(trip)
}

/// ID로 여행 하나를 활동 목록과 함께 조회합니다.
pub async fn get_trip(pool: &SqlitePool, id: &str) -> Result<Option<Trip>, AppError> {
    let Some(mut trip) = fetch_trip_row(pool, id).await? else {
        return Ok(None);
    };
    trip.daily_activities = list_activities(pool, id).await?;
    Ok(Some(trip))
}

/// 특정 사용자의 여행 목록 (최근 생성 순)
pub async fn list_trips_by_owner(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Vec<Trip>, AppError> {
    // rowid: 같은 밀리초에 생성된 행도 삽입 순서로 정렬하기 위한 보조 키
    let trips = sqlx::query_as::<_, Trip>(&format!(
        "SELECT {TRIP_COLUMNS} FROM trips WHERE user_id = ? ORDER BY created_at DESC, rowid DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let activities = sqlx::query_as::<_, DailyActivity>(&format!(
        r#"
        SELECT {ACTIVITY_COLUMNS} FROM daily_activities
        WHERE trip_id IN (SELECT id FROM trips WHERE user_id = ?)
        ORDER BY date ASC, created_at ASC, rowid ASC
        "#
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(attach_activities(trips, activities))
}

/// 시스템 전체 여행 목록 (공개 탐색용, 최근 생성 순)
pub async fn list_all_trips(pool: &SqlitePool) -> Result<Vec<Trip>, AppError> {
    let trips = sqlx::query_as::<_, Trip>(&format!(
        "SELECT {TRIP_COLUMNS} FROM trips ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await?;

    let activities = sqlx::query_as::<_, DailyActivity>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM daily_activities \
         ORDER BY date ASC, created_at ASC, rowid ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(attach_activities(trips, activities))
}

/// 이미 정렬된 활동 목록을 여행별로 나눠 담습니다. 각 그룹 안의 순서는 유지됩니다.
fn attach_activities(mut trips: Vec<Trip>, activities: Vec<DailyActivity>) -> Vec<Trip> {
    let mut by_trip: HashMap<String, Vec<DailyActivity>> = HashMap::new();
    for activity in activities {
        by_trip
            .entry(activity.trip_id.clone())
            .or_default()
            .push(activity);
    }
    for trip in &mut trips {
        trip.daily_activities = by_trip.remove(&trip.id).unwrap_or_default();
    }
    trips
}

/// 새 여행을 생성합니다. 요청자가 소유자가 됩니다.
pub async fn create_trip(
    pool: &SqlitePool,
    owner_id: &str,
    new_trip: &NewTrip,
) -> Result<Trip, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO trips (id, user_id, title, description, start_date, end_date,
                           location, tags, image_url, general_description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(owner_id)
    .bind(&new_trip.title)
    .bind(&new_trip.description)
    .bind(format_date(new_trip.start_date))
    .bind(format_date(new_trip.end_date))
    .bind(&new_trip.location)
    .bind(Json(&new_trip.tags))
    .bind(new_trip.image_url.as_deref())
    .bind(new_trip.general_description.as_deref())
    .execute(pool)
    .await?;

    tracing::info!(trip_id = %id, owner_id, "trip created");

    get_trip(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created trip".to_string()))
}

/// 여행을 부분 수정합니다. 보낸 필드만 변경됩니다.
///
/// 날짜를 바꾸는 경우:
/// - 최종 기간이 `start <= end`여야 하고
/// - 이미 등록된 활동이 모두 새 기간 안에 있어야 합니다.
pub async fn update_trip(
    pool: &SqlitePool,
    id: &str,
    identity: &Identity,
    changes: &TripChanges,
) -> Result<Trip, AppError> {
    let mut tx = begin_write(pool).await?;
    authorize_trip_mutation(&mut *tx, id, identity).await?;

    if changes.is_empty() {
        tx.commit().await?;
        return get_trip(pool, id).await?.ok_or(AppError::NotFound);
    }

    if changes.start_date.is_some() || changes.end_date.is_some() {
        let current = fetch_trip_row(&mut *tx, id).await?.ok_or(AppError::NotFound)?;
        let start = match changes.start_date {
            Some(date) => date,
            None => parse_calendar_date("startDate", &current.start_date)?,
        };
        let end = match changes.end_date {
            Some(date) => date,
            None => parse_calendar_date("endDate", &current.end_date)?,
        };
        if end < start {
            return Err(AppError::Validation(
                "endDate must not be before startDate".to_string(),
            ));
        }

        let outside: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM daily_activities WHERE trip_id = ? AND (date < ? OR date > ?)",
        )
        .bind(id)
        .bind(format_date(start))
        .bind(format_date(end))
        .fetch_one(&mut *tx)
        .await?;
        if outside > 0 {
            return Err(AppError::Validation(format!(
                "{outside} activities fall outside the new trip dates"
            )));
        }
    }

    // ── 동적 쿼리 구성 ──
    // 보낸 필드만 SET 절에 넣고, 값은 순서대로 바인딩합니다.
    // 모든 값이 TEXT 컬럼이므로 Option<String>으로 모읍니다 (None → NULL).
    let mut query =
        String::from("UPDATE trips SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
    let mut bindings: Vec<Option<String>> = Vec::new();

    if let Some(title) = &changes.title {
        query.push_str(", title = ?");
        bindings.push(Some(title.clone()));
    }
    if let Some(description) = &changes.description {
        query.push_str(", description = ?");
        bindings.push(Some(description.clone()));
    }
    if let Some(start_date) = changes.start_date {
        query.push_str(", start_date = ?");
        bindings.push(Some(format_date(start_date)));
    }
    if let Some(end_date) = changes.end_date {
        query.push_str(", end_date = ?");
        bindings.push(Some(format_date(end_date)));
    }
    if let Some(location) = &changes.location {
        query.push_str(", location = ?");
        bindings.push(Some(location.clone()));
    }
    if let Some(tags) = &changes.tags {
        query.push_str(", tags = ?");
        bindings.push(Some(serde_json::to_string(tags).map_err(|e| {
            AppError::Internal(format!("Failed to encode tags: {e}"))
        })?));
    }
    if let Some(image_url) = &changes.image_url {
        query.push_str(", image_url = ?");
        bindings.push(image_url.clone());
    }
    if let Some(general_description) = &changes.general_description {
        query.push_str(", general_description = ?");
        bindings.push(general_description.clone());
    }

    query.push_str(" WHERE id = ?");
    bindings.push(Some(id.to_string()));

    let mut query_builder = sqlx::query(&query);
    for binding in bindings {
        query_builder = query_builder.bind(binding);
    }
    query_builder.execute(&mut *tx).await?;

    tx.commit().await?;

    get_trip(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve updated trip".to_string()))
}

/// 여행과 그 활동 전부를 한 트랜잭션으로 삭제합니다.
///
/// 스키마에도 `ON DELETE CASCADE`가 있지만, 명시적으로 지워서
/// 중간에 실패하면 롤백되어 활동만 남거나 여행만 남는 상태가 생기지 않게 합니다.
pub async fn delete_trip(pool: &SqlitePool, id: &str, identity: &Identity) -> Result<(), AppError> {
    let mut tx = begin_write(pool).await?;
    authorize_trip_mutation(&mut *tx, id, identity).await?;

    let removed = sqlx::query("DELETE FROM daily_activities WHERE trip_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM trips WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(trip_id = id, activities_removed = removed, "trip deleted");
    Ok(())
}

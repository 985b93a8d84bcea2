use crate::db::begin_write;
use crate::db::trips::fetch_trip_row;
use crate::error::AppError;
use crate::models::*;
use crate::services::ownership::authorize_trip_mutation;
use crate::services::validation::{ensure_within_range, format_date, parse_calendar_date};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

pub(crate) const ACTIVITY_COLUMNS: &str =
    "id, trip_id, date, title, description, location, time, notes, tags, created_at, updated_at";

/// Activities of one trip, by date then creation order. Does not check that the trip exists.
pub async fn list_activities<'e, E>(
    executor: E,
    trip_id: &str,
) -> Result<Vec<DailyActivity>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let activities = sqlx::query_as::<_, DailyActivity>(&format!(
        r#"
        SELECT {ACTIVITY_COLUMNS} FROM daily_activities
        WHERE trip_id = ?
        ORDER BY date ASC, created_at ASC, rowid ASC
        "#
    ))
    .bind(trip_id)
    .fetch_all(executor)
    .await?;

    Ok(activities)
}

pub async fn list_activities_for_trip(
    pool: &SqlitePool,
    trip_id: &str,
) -> Result<Vec<DailyActivity>, AppError> {
    if fetch_trip_row(pool, trip_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    list_activities(pool, trip_id).await
}

/// Looks an activity up within its trip. An activity that exists under a
/// different trip is reported as missing.
pub async fn get_activity(
    pool: &SqlitePool,
    trip_id: &str,
    activity_id: &str,
) -> Result<Option<DailyActivity>, AppError> {
    fetch_activity(pool, trip_id, activity_id).await
}

async fn fetch_activity<'e, E>(
    executor: E,
    trip_id: &str,
    activity_id: &str,
) -> Result<Option<DailyActivity>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let activity = sqlx::query_as::<_, DailyActivity>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM daily_activities WHERE id = ? AND trip_id = ?"
    ))
    .bind(activity_id)
    .bind(trip_id)
    .fetch_optional(executor)
    .await?;

    Ok(activity)
}

/// Creates an activity under a trip owned by `identity`. The date must fall
/// inside the trip's date range.
pub async fn create_activity(
    pool: &SqlitePool,
    trip_id: &str,
    identity: &Identity,
    new_activity: &NewActivity,
) -> Result<DailyActivity, AppError> {
    let mut tx = begin_write(pool).await?;
    authorize_trip_mutation(&mut *tx, trip_id, identity).await?;

    let trip = fetch_trip_row(&mut *tx, trip_id)
        .await?
        .ok_or(AppError::NotFound)?;
    check_trip_range(&trip, new_activity.date)?;

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO daily_activities (id, trip_id, date, title, description, location,
                                      time, notes, tags)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(trip_id)
    .bind(format_date(new_activity.date))
    .bind(&new_activity.title)
    .bind(&new_activity.description)
    .bind(&new_activity.location)
    .bind(new_activity.time.as_deref())
    .bind(new_activity.notes.as_deref())
    .bind(Json(&new_activity.tags))
    .execute(&mut *tx)
    .await?;

    let activity = fetch_activity(&mut *tx, trip_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created activity".to_string()))?;
    tx.commit().await?;

    Ok(activity)
}

pub async fn update_activity(
    pool: &SqlitePool,
    trip_id: &str,
    activity_id: &str,
    identity: &Identity,
    changes: &ActivityChanges,
) -> Result<DailyActivity, AppError> {
    let mut tx = begin_write(pool).await?;
    authorize_trip_mutation(&mut *tx, trip_id, identity).await?;

    let current = fetch_activity(&mut *tx, trip_id, activity_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(date) = changes.date {
        let trip = fetch_trip_row(&mut *tx, trip_id)
            .await?
            .ok_or(AppError::NotFound)?;
        check_trip_range(&trip, date)?;
    }

    let mut query = String::from(
        "UPDATE daily_activities SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    );
    let mut bindings: Vec<Option<String>> = Vec::new();

    if let Some(date) = changes.date {
        query.push_str(", date = ?");
        bindings.push(Some(format_date(date)));
    }
    if let Some(title) = &changes.title {
        query.push_str(", title = ?");
        bindings.push(Some(title.clone()));
    }
    if let Some(description) = &changes.description {
        query.push_str(", description = ?");
        bindings.push(Some(description.clone()));
    }
    if let Some(location) = &changes.location {
        query.push_str(", location = ?");
        bindings.push(Some(location.clone()));
    }
    if let Some(time) = &changes.time {
        query.push_str(", time = ?");
        bindings.push(time.clone());
    }
    if let Some(notes) = &changes.notes {
        query.push_str(", notes = ?");
        bindings.push(notes.clone());
    }
    if let Some(tags) = &changes.tags {
        query.push_str(", tags = ?");
        bindings.push(Some(serde_json::to_string(tags).map_err(|e| {
            AppError::Internal(format!("Failed to encode tags: {e}"))
        })?));
    }

    query.push_str(" WHERE id = ?");
    bindings.push(Some(current.id.clone()));

    let mut query_builder = sqlx::query(&query);
    for binding in bindings {
        query_builder = query_builder.bind(binding);
    }
    query_builder.execute(&mut *tx).await?;

    let updated = fetch_activity(&mut *tx, trip_id, activity_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve updated activity".to_string()))?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn delete_activity(
    pool: &SqlitePool,
    trip_id: &str,
    activity_id: &str,
    identity: &Identity,
) -> Result<(), AppError> {
    let mut tx = begin_write(pool).await?;
    authorize_trip_mutation(&mut *tx, trip_id, identity).await?;

    let result = sqlx::query("DELETE FROM daily_activities WHERE id = ? AND trip_id = ?")
        .bind(activity_id)
        .bind(trip_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}

fn check_trip_range(trip: &Trip, date: chrono::NaiveDate) -> Result<(), AppError> {
    let start = parse_calendar_date("startDate", &trip.start_date)?;
    let end = parse_calendar_date("endDate", &trip.end_date)?;
    ensure_within_range(date, start, end)
}

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::{ApiJson, AppState},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

/// `GET /api/trips/{id}/activities`
pub async fn list_activities(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let activities = db::list_activities_for_trip(&state.pool, &trip_id).await?;
    Ok(Json(json!({ "activities": activities })))
}

/// `POST /api/trips/{id}/activities`
pub async fn create_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trip_id): Path<String>,
    ApiJson(req): ApiJson<CreateActivityRequest>,
) -> Result<Json<Value>, AppError> {
    let new_activity = req.validate()?;
    let activity =
        db::create_activity(&state.pool, &trip_id, &auth.identity(), &new_activity).await?;
    Ok(Json(json!({ "activity": activity })))
}

/// `GET /api/trips/{id}/activities/{activity_id}`
pub async fn get_activity(
    State(state): State<AppState>,
    Path((trip_id, activity_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let activity = db::get_activity(&state.pool, &trip_id, &activity_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "activity": activity })))
}

/// `PUT /api/trips/{id}/activities/{activity_id}`
pub async fn update_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((trip_id, activity_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<UpdateActivityRequest>,
) -> Result<Json<Value>, AppError> {
    if req.id.as_deref().is_some_and(|id| id != activity_id) {
        return Err(AppError::Validation(
            "id in body does not match the activity in the path".to_string(),
        ));
    }
    apply_update(&state, &auth, &trip_id, &activity_id, req).await
}

/// `PUT /api/trips/{id}/activities` — the activity id travels in the body.
pub async fn update_activity_by_body(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trip_id): Path<String>,
    ApiJson(req): ApiJson<UpdateActivityRequest>,
) -> Result<Json<Value>, AppError> {
    let activity_id = req
        .id
        .clone()
        .ok_or_else(|| AppError::Validation("id is required".to_string()))?;
    apply_update(&state, &auth, &trip_id, &activity_id, req).await
}

async fn apply_update(
    state: &AppState,
    auth: &AuthUser,
    trip_id: &str,
    activity_id: &str,
    req: UpdateActivityRequest,
) -> Result<Json<Value>, AppError> {
    let changes = req.validate()?;
    let activity =
        db::update_activity(&state.pool, trip_id, activity_id, &auth.identity(), &changes).await?;
    Ok(Json(json!({ "activity": activity })))
}

/// `DELETE /api/trips/{id}/activities/{activity_id}`
pub async fn delete_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((trip_id, activity_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    db::delete_activity(&state.pool, &trip_id, &activity_id, &auth.identity()).await?;
    Ok(Json(json!({ "success": true })))
}

/// `DELETE /api/trips/{id}/activities` with `{ "id": ... }`
pub async fn delete_activity_by_body(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trip_id): Path<String>,
    ApiJson(req): ApiJson<DeleteActivityRequest>,
) -> Result<Json<Value>, AppError> {
    db::delete_activity(&state.pool, &trip_id, &req.id, &auth.identity()).await?;
    Ok(Json(json!({ "success": true })))
}

//! # 여행(Trip) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/trips`          → 내 여행 목록 (로그인 필요)
//! - `POST   /api/trips`          → 새 여행 생성 (로그인 필요, 요청자가 소유자)
//! - `GET    /api/explore/trips`  → 전체 공개 여행 목록
//! - `GET    /api/trips/{id}`     → 단일 여행 조회
//! - `PUT    /api/trips/{id}`     → 여행 부분 수정 (소유자만)
//! - `DELETE /api/trips/{id}`     → 여행 삭제, 활동까지 함께 삭제 (소유자만)
//! - `PUT    /api/trips`          → 본문의 `id`로 지정한 여행 부분 수정
//! - `DELETE /api/trips`          → 본문 `{ "id": ... }`로 지정한 여행 삭제
//!
//! 변경 핸들러는 `AuthUser` 추출기로 익명 요청을 401로 막고,
//! 소유권(403/404) 검사는 `db::trips`가 트랜잭션 안에서 수행합니다.

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

/// `GET /api/trips` — 요청자의 여행 목록 (최근 생성 순, 활동 포함)
pub async fn list_my_trips(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let trips = db::list_trips_by_owner(&state.pool, &auth.user_id).await?;
    Ok(Json(json!({ "trips": trips })))
}

/// `GET /api/explore/trips` — 시스템 전체 여행 목록
pub async fn explore_trips(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let trips = db::list_all_trips(&state.pool).await?;
    Ok(Json(json!({ "trips": trips })))
}

/// `POST /api/trips`
pub async fn create_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateTripRequest>,
) -> Result<Json<Value>, AppError> {
    let new_trip = req.validate()?;
    let trip = db::create_trip(&state.pool, &auth.user_id, &new_trip).await?;
    Ok(Json(json!({ "trip": trip })))
}

/// `GET /api/trips/{id}`
pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let trip = db::get_trip(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "trip": trip })))
}

/// `PUT /api/trips/{id}` — 보낸 필드만 변경합니다.
pub async fn update_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTripRequest>,
) -> Result<Json<Value>, AppError> {
    if req.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(AppError::Validation(
            "id in body does not match the trip in the path".to_string(),
        ));
    }
    apply_update(&state, &auth, &id, req).await
}

/// `PUT /api/trips` — 여행 id를 본문으로 받습니다.
pub async fn update_trip_by_body(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<UpdateTripRequest>,
) -> Result<Json<Value>, AppError> {
    let id = req
        .id
        .clone()
        .ok_or_else(|| AppError::Validation("id is required".to_string()))?;
    apply_update(&state, &auth, &id, req).await
}

async fn apply_update(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    req: UpdateTripRequest,
) -> Result<Json<Value>, AppError> {
    let changes = req.validate()?;
    let trip = db::update_trip(&state.pool, id, &auth.identity(), &changes).await?;
    Ok(Json(json!({ "trip": trip })))
}

/// `DELETE /api/trips/{id}`
pub async fn delete_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::delete_trip(&state.pool, &id, &auth.identity()).await?;
    Ok(Json(json!({ "success": true })))
}

/// `DELETE /api/trips` with `{ "id": ... }`
pub async fn delete_trip_by_body(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<DeleteTripRequest>,
) -> Result<Json<Value>, AppError> {
    db::delete_trip(&state.pool, &req.id, &auth.identity()).await?;
    Ok(Json(json!({ "success": true })))
}

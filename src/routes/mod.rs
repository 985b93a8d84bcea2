//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `activities`: 여행별 일별 활동 CRUD 핸들러
//! - `auth`: 회원가입/로그인/로그아웃, 현재 사용자 조회
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `trips`: 여행 CRUD 핸들러, 공개 탐색 목록

pub mod activities;
pub mod auth;
pub mod health;
pub mod trips;

use std::path::Path;

use axum::{
    extract::FromRequest,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{config::Config, error::AppError, middleware::pages::route_guard};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `main`에서 한 번 만들어 라우터에 넘기며, 전역 변수는 사용하지 않습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    pub config: Config,
}

/// 요청 본문 JSON 추출기
///
/// `axum::Json`과 같지만 실패 시 axum 기본 응답(422 텍스트) 대신
/// `AppError::Validation`(400 JSON)으로 응답합니다.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// 전체 라우터를 구성합니다.
///
/// - `/api/...`: JSON API
/// - 그 외: 페이지 라우트 가드를 거쳐 프론트엔드 정적 파일
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth", get(auth::current_user).post(auth::handle_auth))
        .route(
            "/trips",
            get(trips::list_my_trips)
                .post(trips::create_trip)
                .put(trips::update_trip_by_body)
                .delete(trips::delete_trip_by_body),
        )
        .route("/explore/trips", get(trips::explore_trips))
        .route(
            "/trips/{id}",
            get(trips::get_trip)
                .put(trips::update_trip)
                .delete(trips::delete_trip),
        )
        .route(
            "/trips/{id}/activities",
            get(activities::list_activities)
                .post(activities::create_activity)
                .put(activities::update_activity_by_body)
                .delete(activities::delete_activity_by_body),
        )
        .route(
            "/trips/{id}/activities/{activity_id}",
            get(activities::get_activity)
                .put(activities::update_activity)
                .delete(activities::delete_activity),
        )
        .route("/health", get(health::health_check))
        .fallback(api_not_found);

    let router = Router::new().nest("/api", api_routes);

    // 빌드된 프론트엔드가 있으면 같은 서버에서 서빙합니다 (SPA: 없는 경로는 index.html).
    let frontend_dist = Path::new(&state.config.frontend_dist);
    let router = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", state.config.frontend_dist);
        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));
        router.fallback_service(serve_dir)
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        router.fallback(api_not_found)
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(from_fn_with_state(state.clone(), route_guard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_not_found() -> AppError {
    AppError::NotFound
}

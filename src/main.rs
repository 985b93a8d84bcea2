//! # Tripdeck 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩
//! 4. SQLite 연결 풀 생성 + 마이그레이션 실행
//! 5. 만료된 세션 정리
//! 6. 라우터 구성 후 HTTP 서버 시작

use anyhow::Result; // 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripdeck::{build_router, config::Config, db, middleware::auth, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 tripdeck, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripdeck=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!(
        "Starting Tripdeck server on {}:{} ({})",
        config.host,
        config.port,
        config.app_env
    );

    // ── 4단계: 연결 풀 + 마이그레이션 ──
    tracing::info!("Connecting to database and running migrations...");
    let pool = db::connect(&config.database_url).await?;

    // ── 5단계: 만료 세션 정리 ──
    // 요청 중에도 만료 세션은 발견 즉시 지워지지만, 한 번도 다시 쓰이지 않은 세션은
    // 여기서 정리합니다.
    let purged = auth::purge_expired_sessions(&pool).await?;
    if purged > 0 {
        tracing::info!("Purged {} expired sessions", purged);
    }

    // ── 6단계: 라우터 구성 + 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let app = build_router(AppState { pool, config });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! # Tripdeck 라이브러리 크레이트
//!
//! 서버 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 함께 쓰는 모듈들을 공개합니다.
//! 바이너리는 설정을 읽고 서버를 띄우는 일만 하고, 나머지는 모두 여기에 있습니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{build_router, AppState};

//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `activity`: 여행의 일별 활동(DailyActivity) 관련 구조체
//! - `session`: 로그인 세션과 요청자 신원(Identity)
//! - `trip`: 여행(Trip) 관련 구조체
//! - `user`: 사용자(User)와 인증 요청/응답 구조체
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Trip`처럼 짧게 쓸 수 있습니다.

pub mod activity;
pub mod session;
pub mod trip;
pub mod user;

pub use activity::*;
pub use session::*;
pub use trip::*;
pub use user::*;

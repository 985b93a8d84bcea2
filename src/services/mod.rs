//! # 서비스 계층
//!
//! 라우트 핸들러와 DB 쿼리 사이의 도메인 로직입니다.
//! - `credentials`: 계정 생성, 비밀번호 해싱/검증
//! - `ownership`: 여행 변경 권한 검사
//! - `validation`: 요청 값 정리와 날짜 검사

pub mod credentials;
pub mod ownership;
pub mod validation;

//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `APP_ENV`: 실행 환경. `development`가 아니면 세션 쿠키에 `Secure`를 붙입니다.
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 정적 파일 디렉토리
//! - `SESSION_TTL_DAYS`: 세션 유효 기간(일)

use std::env;

/// 세션 기본 유효 기간: 7일
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// 세션 유효 기간 상한: 1년. 만료 시각과 쿠키 Max-Age 계산이 넘치지 않는 범위입니다.
pub const MAX_SESSION_TTL_DAYS: i64 = 365;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 `AppState`를 통해 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/tripdeck.db")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 실행 환경 이름 (기본값: "development")
    pub app_env: String,
    /// 프론트엔드 빌드 결과물 경로 (기본값: "../frontend/dist")
    pub frontend_dist: String,
    /// 세션 유효 기간(일)
    pub session_ttl_days: i64,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            session_ttl_days: session_ttl_days(env::var("SESSION_TTL_DAYS").ok().as_deref()),
        })
    }

    /// 로컬 개발 환경이 아니면 쿠키에 `Secure` 속성을 붙여야 합니다.
    pub fn secure_cookies(&self) -> bool {
        self.app_env != "development"
    }

    /// 테스트와 로컬 실행용 설정. 환경변수를 읽지 않습니다.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 0,
            app_env: "development".to_string(),
            frontend_dist: "../frontend/dist".to_string(),
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
        }
    }
}

/// `SESSION_TTL_DAYS` 값 해석. 숫자가 아니거나 0 이하이면 기본값, 상한을 넘으면 상한으로 맞춥니다.
fn session_ttl_days(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|days| *days > 0)
        .map(|days| days.min(MAX_SESSION_TTL_DAYS))
        .unwrap_or(DEFAULT_SESSION_TTL_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_cookies_are_not_secure() {
        let config = Config::for_database("sqlite::memory:");
        assert!(!config.secure_cookies());
    }

    #[test]
    fn production_cookies_are_secure() {
        let mut config = Config::for_database("sqlite::memory:");
        config.app_env = "production".to_string();
        assert!(config.secure_cookies());
    }

    #[test]
    fn session_ttl_falls_back_to_default() {
        assert_eq!(session_ttl_days(None), DEFAULT_SESSION_TTL_DAYS);
        assert_eq!(session_ttl_days(Some("soon")), DEFAULT_SESSION_TTL_DAYS);
        assert_eq!(session_ttl_days(Some("0")), DEFAULT_SESSION_TTL_DAYS);
        assert_eq!(session_ttl_days(Some("-3")), DEFAULT_SESSION_TTL_DAYS);
        assert_eq!(session_ttl_days(Some("30")), 30);
    }

    #[test]
    fn huge_session_ttl_is_capped() {
        assert_eq!(session_ttl_days(Some("9223372036854775807")), MAX_SESSION_TTL_DAYS);
        assert_eq!(session_ttl_days(Some("100000000000")), MAX_SESSION_TTL_DAYS);
    }
}

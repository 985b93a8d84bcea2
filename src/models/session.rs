//! # 로그인 세션 모델 정의
//!
//! 쿠키로 전달되는 세션 토큰과 서버 측 `sessions` 테이블의 한 행을 표현합니다.
//!
//! ## 세션 흐름
//! 1. 로그인/회원가입 성공 시 무작위 토큰을 만들고, 해시만 DB에 저장
//! 2. 요청마다 쿠키의 토큰을 해싱해 DB에서 찾고 만료 여부를 확인
//! 3. 로그아웃하면 행을 삭제하여 토큰을 즉시 무효화

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 세션 엔티티 — DB의 `sessions` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Session {
    /// 토큰 원문의 SHA-256 해시 (16진수 문자열)
    pub token_hash: String,
    /// 세션 소유자
    pub user_id: String,
    pub created_at: String,
    /// 만료 시각 (RFC 3339, 밀리초 정밀도)
    pub expires_at: String,
}

impl Session {
    /// 만료 시각이 지났거나 파싱할 수 없으면 만료된 것으로 봅니다.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => expires_at.with_timezone(&Utc) <= now,
            Err(_) => true,
        }
    }
}

/// 요청자의 신원. 세션이 없거나 만료되면 `Anonymous`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    User(String),
}

impl Identity {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::User(id) => Some(id),
            Identity::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_at(expires_at: DateTime<Utc>) -> Session {
        Session {
            token_hash: "hash".to_string(),
            user_id: "user".to_string(),
            created_at: Utc::now().to_rfc3339(),
            expires_at: expires_at.to_rfc3339(),
        }
    }

    #[test]
    fn future_expiry_is_live() {
        let now = Utc::now();
        assert!(!session_expiring_at(now + Duration::days(1)).is_expired(now));
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        assert!(session_expiring_at(now - Duration::seconds(1)).is_expired(now));
    }

    #[test]
    fn garbage_expiry_counts_as_expired() {
        let mut session = session_expiring_at(Utc::now());
        session.expires_at = "not a date".to_string();
        assert!(session.is_expired(Utc::now()));
    }
}

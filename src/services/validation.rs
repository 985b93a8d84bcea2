//! # 입력 검증 유틸리티
//!
//! 요청 본문의 문자열을 저장 가능한 값으로 정리하고 검사하는 함수들입니다.
//!
//! 이 모듈의 함수들:
//! - `parse_calendar_date()`: "YYYY-MM-DD" 또는 RFC 3339 문자열을 날짜로 변환
//! - `format_date()`: 날짜를 DB 저장 형식("YYYY-MM-DD")으로 변환
//! - `require_text()`: 필수 문자열 필드의 공백 제거 및 빈 값 검사
//! - `normalize_optional()`: 선택 문자열 필드에서 빈 값을 None으로 정리
//! - `normalize_tags()`: 태그 목록 정리 (공백 제거, 빈 태그 제거, 중복 제거, 순서 유지)
//! - `ensure_within_range()`: 활동 날짜가 여행 기간 안에 있는지 검사

use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 달력 날짜를 파싱합니다.
///
/// 프론트엔드의 날짜 선택기는 "2026-05-01"을 보내지만, `Date.toISOString()` 형태
/// ("2026-05-01T00:00:00.000Z")도 받아들입니다. 이 경우 UTC 기준 날짜만 사용합니다.
pub fn parse_calendar_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| AppError::Validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 필수 텍스트 필드: 앞뒤 공백을 제거하고, 비어 있으면 검증 에러를 반환합니다.
pub fn require_text(field: &str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// 선택 텍스트 필드: 공백뿐인 값은 None으로 취급합니다.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 태그 목록을 정리합니다.
///
/// 태그는 "집합"이지만 사용자가 입력한 순서를 그대로 보여줘야 하므로,
/// 처음 등장한 위치를 유지한 채 중복만 제거합니다.
/// 예: `[" beach", "hiking", "beach", ""]` → `["beach", "hiking"]`
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || seen.iter().any(|t| t == tag) {
            continue;
        }
        seen.push(tag.to_string());
    }
    seen
}

/// 활동 날짜가 여행 기간 `[start, end]` 안에 있는지 검사합니다.
pub fn ensure_within_range(
    date: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), AppError> {
    if date < start || date > end {
        return Err(AppError::Validation(format!(
            "date {} is outside the trip dates {} to {}",
            format_date(date),
            format_date(start),
            format_date(end)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_calendar_date("date", "2026-05-01").unwrap(), ymd(2026, 5, 1));
        assert_eq!(parse_calendar_date("date", " 2026-05-01 ").unwrap(), ymd(2026, 5, 1));
    }

    #[test]
    fn parses_iso_timestamps_as_utc_dates() {
        let date = parse_calendar_date("date", "2026-05-01T23:30:00.000-02:00").unwrap();
        assert_eq!(date, ymd(2026, 5, 2));
    }

    #[test]
    fn rejects_unparsable_dates() {
        let err = parse_calendar_date("startDate", "2026-13-01").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("startDate")));
        assert!(parse_calendar_date("date", "").is_err());
    }

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("title", "  Rome  ".to_string()).unwrap(), "Rome");
        assert!(require_text("title", "   ".to_string()).is_err());
    }

    #[test]
    fn normalize_tags_keeps_first_occurrence_order() {
        let tags = vec![
            " beach".to_string(),
            "hiking".to_string(),
            "beach".to_string(),
            "".to_string(),
            "food ".to_string(),
        ];
        assert_eq!(normalize_tags(tags), vec!["beach", "hiking", "food"]);
    }

    #[test]
    fn tags_are_case_sensitive() {
        let tags = vec!["Beach".to_string(), "beach".to_string()];
        assert_eq!(normalize_tags(tags), vec!["Beach", "beach"]);
    }

    #[test]
    fn range_is_inclusive() {
        let (start, end) = (ymd(2026, 5, 1), ymd(2026, 5, 3));
        assert!(ensure_within_range(start, start, end).is_ok());
        assert!(ensure_within_range(end, start, end).is_ok());
        assert!(ensure_within_range(ymd(2026, 4, 30), start, end).is_err());
        assert!(ensure_within_range(ymd(2026, 5, 4), start, end).is_err());
    }
}

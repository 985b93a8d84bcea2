//! # 여행(Trip) 모델 정의
//!
//! ## 구조체 역할
//! - `Trip`: DB의 `trips` 테이블 한 행 + 일별 활동 목록 (응답용)
//! - `CreateTripRequest` / `NewTrip`: 생성 요청 본문과 검증을 통과한 값
//! - `UpdateTripRequest` / `TripChanges`: 부분 수정 요청 본문과 검증을 통과한 값
//!
//! JSON 필드명은 camelCase(`startDate`, `dailyActivities`)를 사용합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::activity::DailyActivity;
use crate::error::AppError;
use crate::services::validation::{
    normalize_optional, normalize_tags, parse_calendar_date, require_text,
};

/// 여행 엔티티
///
/// `daily_activities`는 `trips` 테이블의 컬럼이 아니므로 `#[sqlx(skip)]`으로
/// FromRow 매핑에서 제외하고, 조회 후 `db::trips`가 채워 넣습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    /// "YYYY-MM-DD"
    pub start_date: String,
    /// "YYYY-MM-DD"
    pub end_date: String,
    pub location: String,
    /// JSON 배열 문자열로 저장된 태그 목록 (순서 보존)
    pub tags: Json<Vec<String>>,
    pub image_url: Option<String>,
    pub general_description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub daily_activities: Vec<DailyActivity>,
}

/// `POST /api/trips` 요청 본문
///
/// `deny_unknown_fields`: 스키마에 없는 필드가 오면 역직렬화가 실패하고 400으로 응답합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTripRequest {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub general_description: Option<String>,
}

/// 검증을 통과한 새 여행 데이터
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub general_description: Option<String>,
}

impl CreateTripRequest {
    pub fn validate(self) -> Result<NewTrip, AppError> {
        let start_date = parse_calendar_date("startDate", &self.start_date)?;
        let end_date = parse_calendar_date("endDate", &self.end_date)?;
        if end_date < start_date {
            return Err(AppError::Validation(
                "endDate must not be before startDate".to_string(),
            ));
        }

        Ok(NewTrip {
            title: require_text("title", self.title)?,
            description: require_text("description", self.description)?,
            start_date,
            end_date,
            location: require_text("location", self.location)?,
            tags: normalize_tags(self.tags),
            image_url: normalize_optional(self.image_url),
            general_description: normalize_optional(self.general_description),
        })
    }
}

/// `PUT /api/trips/{id}` 요청 본문 — 보낸 필드만 변경합니다.
///
/// `PUT /api/trips`로 보낼 때는 `id`가 필수이고, 경로에 id가 있으면 같아야 합니다.
///
/// `image_url`, `general_description`은 `Option<Option<String>>`:
/// - 필드 누락 → `None` (변경 안 함)
/// - `null` → `Some(None)` (값 지우기)
/// - 문자열 → `Some(Some(값))`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTripRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub general_description: Option<Option<String>>,
}

/// 검증을 통과한 부분 수정 데이터
#[derive(Debug, Clone, Default)]
pub struct TripChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<Option<String>>,
    pub general_description: Option<Option<String>>,
}

impl UpdateTripRequest {
    pub fn validate(self) -> Result<TripChanges, AppError> {
        Ok(TripChanges {
            title: self.title.map(|v| require_text("title", v)).transpose()?,
            description: self
                .description
                .map(|v| require_text("description", v))
                .transpose()?,
            start_date: self
                .start_date
                .map(|v| parse_calendar_date("startDate", &v))
                .transpose()?,
            end_date: self
                .end_date
                .map(|v| parse_calendar_date("endDate", &v))
                .transpose()?,
            location: self.location.map(|v| require_text("location", v)).transpose()?,
            tags: self.tags.map(normalize_tags),
            image_url: self.image_url.map(normalize_optional),
            general_description: self.general_description.map(normalize_optional),
        })
    }
}

/// `DELETE /api/trips` 요청 본문
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteTripRequest {
    pub id: String,
}

impl TripChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.location.is_none()
            && self.tags.is_none()
            && self.image_url.is_none()
            && self.general_description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateTripRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Lisbon",
            "description": "Long weekend",
            "startDate": "2026-05-01",
            "endDate": "2026-05-04",
            "location": "Portugal",
            "tags": ["beach", "hiking"]
        }))
        .unwrap()
    }

    #[test]
    fn create_request_validates() {
        let trip = create_request().validate().unwrap();
        assert_eq!(trip.title, "Lisbon");
        assert_eq!(trip.start_date, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        assert_eq!(trip.tags, vec!["beach", "hiking"]);
        assert!(trip.image_url.is_none());
    }

    #[test]
    fn create_request_rejects_reversed_dates() {
        let mut req = create_request();
        req.end_date = "2026-04-30".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_request_rejects_unknown_fields() {
        let result: Result<CreateTripRequest, _> = serde_json::from_value(serde_json::json!({
            "title": "Lisbon",
            "description": "d",
            "startDate": "2026-05-01",
            "endDate": "2026-05-04",
            "location": "Portugal",
            "userId": "someone-else"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn update_request_distinguishes_null_from_missing() {
        let req: UpdateTripRequest =
            serde_json::from_value(serde_json::json!({ "imageUrl": null })).unwrap();
        let changes = req.validate().unwrap();
        assert_eq!(changes.image_url, Some(None));
        assert_eq!(changes.general_description, None);
    }

    #[test]
    fn update_request_rejects_bad_date() {
        let req: UpdateTripRequest =
            serde_json::from_value(serde_json::json!({ "startDate": "next tuesday" })).unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn update_request_carries_optional_id() {
        let req: UpdateTripRequest =
            serde_json::from_value(serde_json::json!({ "id": "t1", "title": "Porto" })).unwrap();
        assert_eq!(req.id.as_deref(), Some("t1"));
        let changes = req.validate().unwrap();
        assert_eq!(changes.title.as_deref(), Some("Porto"));
    }

    #[test]
    fn text_fields_are_trimmed() {
        let mut req = create_request();
        req.title = "  Lisbon  ".to_string();
        req.image_url = Some("   ".to_string());
        let trip = req.validate().unwrap();
        assert_eq!(trip.title, "Lisbon");
        assert!(trip.image_url.is_none());
    }

    #[test]
    fn empty_update_is_empty() {
        let changes = UpdateTripRequest::default().validate().unwrap();
        assert!(changes.is_empty());
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::AppError;
use crate::services::validation::{
    normalize_optional, normalize_tags, parse_calendar_date, require_text,
};

/// One planned event on a calendar day of a trip.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub id: String,
    pub trip_id: String,
    /// "YYYY-MM-DD"
    pub date: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub tags: Json<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateActivityRequest {
    pub date: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub time: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub location: String,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl CreateActivityRequest {
    pub fn validate(self) -> Result<NewActivity, AppError> {
        Ok(NewActivity {
            date: parse_calendar_date("date", &self.date)?,
            title: require_text("title", self.title)?,
            description: require_text("description", self.description)?,
            location: require_text("location", self.location)?,
            time: normalize_optional(self.time),
            notes: normalize_optional(self.notes),
            tags: normalize_tags(self.tags),
        })
    }
}

/// Partial update. `id` is required when the activity is addressed through the
/// collection route (`PUT /api/trips/{id}/activities`) and must match the path
/// otherwise.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateActivityRequest {
    pub id: Option<String>,
    pub date: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub time: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityChanges {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub time: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl UpdateActivityRequest {
    pub fn validate(self) -> Result<ActivityChanges, AppError> {
        Ok(ActivityChanges {
            date: self
                .date
                .map(|v| parse_calendar_date("date", &v))
                .transpose()?,
            title: self.title.map(|v| require_text("title", v)).transpose()?,
            description: self
                .description
                .map(|v| require_text("description", v))
                .transpose()?,
            location: self.location.map(|v| require_text("location", v)).transpose()?,
            time: self.time.map(normalize_optional),
            notes: self.notes.map(normalize_optional),
            tags: self.tags.map(normalize_tags),
        })
    }
}

/// Body of `DELETE /api/trips/{id}/activities`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteActivityRequest {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_to_empty() {
        let req: CreateActivityRequest = serde_json::from_value(serde_json::json!({
            "date": "2026-05-02",
            "title": "Surf lesson",
            "description": "Beginner group",
            "location": "Costa da Caparica"
        }))
        .unwrap();
        let activity = req.validate().unwrap();
        assert!(activity.time.is_none());
        assert!(activity.notes.is_none());
        assert!(activity.tags.is_empty());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result: Result<CreateActivityRequest, _> = serde_json::from_value(serde_json::json!({
            "date": "2026-05-02",
            "title": "Surf lesson"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let req: CreateActivityRequest = serde_json::from_value(serde_json::json!({
            "date": "2026-05-02",
            "title": "   ",
            "description": "d",
            "location": "l"
        }))
        .unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn null_time_clears() {
        let req: UpdateActivityRequest =
            serde_json::from_value(serde_json::json!({ "time": null, "notes": "bring towel" }))
                .unwrap();
        let changes = req.validate().unwrap();
        assert_eq!(changes.time, Some(None));
        assert_eq!(changes.notes, Some(Some("bring towel".to_string())));
    }
}

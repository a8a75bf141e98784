use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting as stored in the `jobs` table.
/// Serialized with camelCase keys for the public API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    pub is_remote: bool,
    pub status: String,
    pub posted_by: Option<Uuid>,
    pub posted_at: DateTime<Utc>,
    pub closing_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const EMPLOYMENT_TYPES: &[&str] = &[
    "full-time",
    "part-time",
    "contract",
    "temporary",
    "internship",
    "freelance",
];

pub fn valid_employment_type(value: &str) -> bool {
    EMPLOYMENT_TYPES.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_employment_types_accepted() {
        for t in EMPLOYMENT_TYPES {
            assert!(valid_employment_type(t));
        }
    }

    #[test]
    fn test_unknown_employment_type_rejected() {
        assert!(!valid_employment_type("gig"));
        assert!(!valid_employment_type("Full-Time"));
        assert!(!valid_employment_type(""));
    }
}

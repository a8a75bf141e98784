use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A contact/project inquiry submitted through the public form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: String,
    pub project_type: String,
    pub message: String,
    pub timeline: String,
    pub status: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

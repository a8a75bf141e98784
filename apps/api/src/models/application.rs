use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: Option<String>,
    pub role: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// An application row without the raw resume bytes. This is what every
/// listing and detail query selects; the bytes themselves are only ever
/// loaded by the resume download endpoint.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub job_id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub resume_size: i64,
    pub resume_mime_type: String,
    pub resume_original_name: String,
    pub cover_letter: Option<String>,
    pub experiences: Json<Vec<Experience>>,
    pub education: Json<Vec<Education>>,
    pub skills: Vec<String>,
    pub status: String,
    pub terms_accepted: bool,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewed_by: Option<Uuid>,
    pub notes: Vec<String>,
}

/// The resume blob plus the metadata needed to serve it.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeFile {
    pub resume_data: Vec<u8>,
    pub resume_mime_type: String,
    pub resume_original_name: String,
}

/// API payload for an application: resume metadata plus a download URL in
/// place of the embedded bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub resume_size: i64,
    pub resume_mime_type: String,
    pub resume_original_name: String,
    pub resume_download_url: String,
    pub cover_letter: Option<String>,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub status: String,
    pub terms_accepted: bool,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewed_by: Option<Uuid>,
    pub notes: Vec<String>,
}

impl From<ApplicationRecord> for ApplicationResponse {
    fn from(record: ApplicationRecord) -> Self {
        let resume_download_url = format!("/api/applications/{}/resume", record.id);
        Self {
            id: record.id,
            job_id: record.job_id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            resume_size: record.resume_size,
            resume_mime_type: record.resume_mime_type,
            resume_original_name: record.resume_original_name,
            resume_download_url,
            cover_letter: record.cover_letter,
            experiences: record.experiences.0,
            education: record.education.0,
            skills: record.skills,
            status: record.status,
            terms_accepted: record.terms_accepted,
            applied_at: record.applied_at,
            updated_at: record.updated_at,
            reviewed_by: record.reviewed_by,
            notes: record.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Uuid) -> ApplicationRecord {
        ApplicationRecord {
            id,
            job_id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            email: "ada@example.com".to_string(),
            phone: None,
            resume_size: 1024,
            resume_mime_type: "application/pdf".to_string(),
            resume_original_name: "ada.pdf".to_string(),
            cover_letter: None,
            experiences: Json(vec![]),
            education: Json(vec![]),
            skills: vec![],
            status: "submitted".to_string(),
            terms_accepted: true,
            applied_at: Utc::now(),
            updated_at: Utc::now(),
            reviewed_by: None,
            notes: vec![],
        }
    }

    #[test]
    fn test_response_synthesizes_download_url() {
        let id = Uuid::new_v4();
        let response = ApplicationResponse::from(record(id));
        assert_eq!(
            response.resume_download_url,
            format!("/api/applications/{id}/resume")
        );
    }

    #[test]
    fn test_response_serialization_has_no_resume_bytes() {
        let response = ApplicationResponse::from(record(Uuid::new_v4()));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("resumeData").is_none());
        assert!(json.get("resume_data").is_none());
        assert_eq!(json["resumeOriginalName"], "ada.pdf");
        assert_eq!(json["status"], "submitted");
    }
}

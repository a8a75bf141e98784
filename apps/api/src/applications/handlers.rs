use axum::{
    extract::{Multipart, Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::IntoResponse,
    Json,
};
use anyhow::anyhow;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::resume;
use crate::applications::status::ApplicationStatus;
use crate::auth::AdminAuth;
use crate::email::normalize_email;
use crate::errors::AppError;
use crate::jobs::gate::accepts_applications;
use crate::models::application::{ApplicationRecord, ApplicationResponse, ResumeFile};
use crate::pagination::page_window;
use crate::state::AppState;

const APPLICATION_COLUMNS: &str = "id, job_id, first_name, last_name, email, phone, \
     resume_size, resume_mime_type, resume_original_name, cover_letter, experiences, \
     education, skills, status, terms_accepted, applied_at, updated_at, reviewed_by, notes";

const UNIQUE_VIOLATION: &str = "23505";

/// Two racing applies can both pass the duplicate pre-check; the unique
/// (job_id, email) index settles it, and the violation surfaces as a conflict.
fn map_insert_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::Conflict(
                "An application for this job already exists for this email".to_string(),
            )
        }
        _ => AppError::Database(e),
    }
}

/// A resume field captured as-is from the form. Validation is deferred to
/// `handle_apply` so it runs in precondition order, after the posting gate.
#[derive(Debug)]
struct RawResume {
    data: Bytes,
    mime_type: String,
    original_name: String,
}

/// Multipart form fields collected from the apply request.
#[derive(Debug, Default)]
struct ApplyForm {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    cover_letter: Option<String>,
    terms_accepted: bool,
    resume: Option<RawResume>,
}

async fn read_apply_form(mut multipart: Multipart) -> Result<ApplyForm, AppError> {
    let mut form = ApplyForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "resume" {
            let original_name = field.file_name().unwrap_or("resume").to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read resume file: {e}")))?;
            form.resume = Some(RawResume {
                data,
                mime_type,
                original_name,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart field '{name}': {e}")))?;
        match name.as_str() {
            "firstName" => form.first_name = Some(value),
            "lastName" => form.last_name = Some(value),
            "email" => form.email = Some(value),
            "phone" => form.phone = Some(value),
            "coverLetter" => form.cover_letter = Some(value),
            "termsAccepted" => form.terms_accepted = value == "true",
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/applications/apply/:job_id
///
/// Precondition order is load-bearing: required fields, posting gate, file
/// presence, resume validation, then the uniqueness check. Each failure
/// short-circuits with its own error.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    let form = read_apply_form(multipart).await?;

    let first_name = form.first_name.unwrap_or_default();
    let email = normalize_email(&form.email.unwrap_or_default());
    if first_name.is_empty() || email.is_empty() || !form.terms_accepted {
        warn!(%job_id, "Apply rejected: missing required fields");
        return Err(AppError::Validation(
            "Missing required fields: firstName, email, termsAccepted".to_string(),
        ));
    }

    let job_status: Option<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;
    if !accepts_applications(job_status.as_deref()) {
        warn!(%job_id, "Apply rejected: job not found or not open");
        return Err(AppError::NotFound("Job not found or not open".to_string()));
    }

    let Some(raw) = form.resume else {
        warn!(%job_id, "Apply rejected: no resume file uploaded");
        return Err(AppError::Validation("Resume file is required".to_string()));
    };
    let resume = resume::ingest(raw.data, &raw.mime_type, &raw.original_name)?;

    let duplicate: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM applications WHERE job_id = $1 AND email = $2)",
    )
    .bind(job_id)
    .bind(&email)
    .fetch_one(&state.db)
    .await?;
    if duplicate {
        warn!(%job_id, "Apply rejected: duplicate application");
        return Err(AppError::Conflict(
            "An application for this job already exists for this email".to_string(),
        ));
    }

    let application: ApplicationRecord = sqlx::query_as(&format!(
        r#"
        INSERT INTO applications
            (id, job_id, first_name, last_name, email, phone,
             resume_data, resume_size, resume_mime_type, resume_original_name,
             cover_letter, terms_accepted)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {APPLICATION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(&first_name)
    .bind(&form.last_name)
    .bind(&email)
    .bind(&form.phone)
    .bind(resume.data.as_ref())
    .bind(resume.size)
    .bind(&resume.mime_type)
    .bind(&resume.original_name)
    .bind(&form.cover_letter)
    .bind(true)
    .fetch_one(&state.db)
    .await
    .map_err(map_insert_error)?;

    info!(application_id = %application.id, %job_id, "Application submitted");
    Ok((StatusCode::CREATED, Json(application.into())))
}

/// GET /api/applications/job/:job_id/applicants — public listing, no resume
/// bytes, each entry carries a synthesized download URL.
pub async fn handle_list_applicants(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationResponse>>, AppError> {
    let applicants: Vec<ApplicationRecord> = sqlx::query_as(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 ORDER BY applied_at DESC"
    ))
    .bind(job_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        applicants.into_iter().map(ApplicationResponse::from).collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct AdminApplicationsQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/applications/job/:job_id (admin) — filtered, paginated.
pub async fn handle_admin_list_applications(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(job_id): Path<Uuid>,
    Query(params): Query<AdminApplicationsQuery>,
) -> Result<Json<Vec<ApplicationResponse>>, AppError> {
    let window = page_window(params.page, params.limit, 20, state.config.max_page_size);

    let applications: Vec<ApplicationRecord> = sqlx::query_as(&format!(
        r#"
        SELECT {APPLICATION_COLUMNS} FROM applications
        WHERE job_id = $1
          AND ($2::text IS NULL OR status = $2)
        ORDER BY applied_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(job_id)
    .bind(&params.status)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        applications.into_iter().map(ApplicationResponse::from).collect(),
    ))
}

/// GET /api/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application: Option<ApplicationRecord> = sqlx::query_as(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let application =
        application.ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    Ok(Json(application.into()))
}

#[derive(Debug, Deserialize)]
pub struct ResumeViewQuery {
    #[serde(default)]
    pub view: bool,
}

/// `inline` lets the browser render the file; `attachment` forces a download.
pub fn content_disposition(view: bool, filename: &str) -> String {
    let kind = if view { "inline" } else { "attachment" };
    format!("{kind}; filename=\"{filename}\"")
}

/// GET /api/applications/:id/resume?view=true|false — raw stored bytes.
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ResumeViewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let file: Option<ResumeFile> = sqlx::query_as(
        "SELECT resume_data, resume_mime_type, resume_original_name FROM applications WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let file = file.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    info!(application_id = %id, view = params.view, "Resume served");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, file.resume_mime_type),
            (
                CONTENT_DISPOSITION,
                content_disposition(params.view, &file.resume_original_name),
            ),
        ],
        file.resume_data,
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// PATCH /api/applications/:id/status (admin)
///
/// The write is conditional on the status the transition was validated
/// against, so two concurrent requests cannot both win: the loser sees zero
/// rows updated and surfaces a conflict.
pub async fn handle_update_status(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let current: Option<String> = sqlx::query_scalar("SELECT status FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let current = current.ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let requested = req
        .status
        .ok_or_else(|| AppError::Validation("Status is required".to_string()))?;
    let next = ApplicationStatus::parse(&requested)
        .ok_or_else(|| AppError::Validation(format!("Unknown application status '{requested}'")))?;
    let from = ApplicationStatus::parse(&current)
        .ok_or_else(|| AppError::Internal(anyhow!("Stored status '{current}' is not valid")))?;

    if !from.can_transition_to(next) {
        warn!(application_id = %id, %from, %next, "Invalid status transition");
        return Err(AppError::Validation(format!(
            "Invalid status transition from {from} to {next}"
        )));
    }

    let updated: Option<ApplicationRecord> = sqlx::query_as(&format!(
        r#"
        UPDATE applications
        SET status = $1, reviewed_by = $2, updated_at = now()
        WHERE id = $3 AND status = $4
        RETURNING {APPLICATION_COLUMNS}
        "#
    ))
    .bind(next.as_str())
    .bind(admin.id)
    .bind(id)
    .bind(from.as_str())
    .fetch_optional(&state.db)
    .await?;

    match updated {
        Some(application) => {
            info!(application_id = %id, status = %next, admin_id = %admin.id, "Application status updated");
            Ok(Json(application.into()))
        }
        None => {
            // The row moved under us (or vanished) between read and write.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&state.db)
                    .await?;
            if exists {
                Err(AppError::Conflict(
                    "Application status changed concurrently".to_string(),
                ))
            } else {
                Err(AppError::NotFound("Application not found".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header::CONTENT_TYPE as CONTENT_TYPE_HEADER, Request};
    use std::borrow::Cow;

    #[test]
    fn test_disposition_inline_iff_view() {
        assert_eq!(
            content_disposition(true, "cv.pdf"),
            "inline; filename=\"cv.pdf\""
        );
        assert_eq!(
            content_disposition(false, "cv.pdf"),
            "attachment; filename=\"cv.pdf\""
        );
    }

    async fn parse_form(body: &'static str) -> ApplyForm {
        let request = Request::builder()
            .header(
                CONTENT_TYPE_HEADER,
                "multipart/form-data; boundary=BOUNDARY",
            )
            .body(Body::from(body))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        read_apply_form(multipart).await.unwrap()
    }

    // Form parsing must capture the file as-is; rejecting a bad upload is a
    // later precondition, after the posting gate has answered.
    #[tokio::test]
    async fn test_form_parsing_defers_resume_validation() {
        let form = parse_form(concat!(
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"firstName\"\r\n\r\n",
            "Ada\r\n",
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"resume\"; filename=\"cv.txt\"\r\n",
            "Content-Type: text/plain\r\n\r\n",
            "not a pdf\r\n",
            "--BOUNDARY--\r\n"
        ))
        .await;

        let raw = form.resume.expect("resume field captured");
        assert_eq!(raw.original_name, "cv.txt");
        assert_eq!(raw.data.as_ref(), b"not a pdf");
        assert!(resume::ingest(raw.data, &raw.mime_type, &raw.original_name).is_err());
    }

    #[tokio::test]
    async fn test_form_parsing_collects_text_fields() {
        let form = parse_form(concat!(
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"firstName\"\r\n\r\n",
            "Ada\r\n",
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"email\"\r\n\r\n",
            "Ada@Example.com\r\n",
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"termsAccepted\"\r\n\r\n",
            "true\r\n",
            "--BOUNDARY--\r\n"
        ))
        .await;

        assert_eq!(form.first_name.as_deref(), Some("Ada"));
        assert_eq!(form.email.as_deref(), Some("Ada@Example.com"));
        assert!(form.terms_accepted);
        assert!(form.resume.is_none());
    }

    #[derive(Debug)]
    struct StubDbError(&'static str);

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "database error {}", self.0)
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = map_insert_error(sqlx::Error::Database(Box::new(StubDbError("23505"))));
        assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        let err = map_insert_error(sqlx::Error::Database(Box::new(StubDbError("40001"))));
        assert!(matches!(err, AppError::Database(_)), "{err:?}");
        let err = map_insert_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)), "{err:?}");
    }
}

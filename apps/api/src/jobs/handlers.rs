use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::{AdminAuth, OptionalAdmin};
use crate::errors::AppError;
use crate::jobs::gate::{visible_to_public, JobStatus};
use crate::models::job::{valid_employment_type, JobRow};
use crate::pagination::page_window;
use crate::state::AppState;

const JOB_COLUMNS: &str = "id, title, description, department, location, employment_type, \
     salary_min, salary_max, responsibilities, qualifications, is_remote, status, \
     posted_by, posted_at, closing_date, tags, created_at, updated_at";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub responsibilities: Option<Vec<String>>,
    pub qualifications: Option<Vec<String>>,
    pub is_remote: Option<bool>,
    pub status: Option<String>,
    pub closing_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

fn validate_status(status: &str) -> Result<(), AppError> {
    JobStatus::parse(status)
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("Unknown job status '{status}'")))
}

fn validate_employment_type(value: &str) -> Result<(), AppError> {
    if valid_employment_type(value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unknown employment type '{value}'"
        )))
    }
}

/// POST /api/jobs (admin)
pub async fn handle_create_job(
    State(state): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let (Some(title), Some(description), Some(department)) =
        (req.title, req.description, req.department)
    else {
        return Err(AppError::Validation(
            "Missing required job fields (title, description, department, responsibilities, qualifications)"
                .to_string(),
        ));
    };
    let responsibilities = req
        .responsibilities
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation("At least one responsibility is required".to_string()))?;
    let qualifications = req
        .qualifications
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("At least one qualification is required".to_string()))?;

    if let Some(et) = req.employment_type.as_deref() {
        validate_employment_type(et)?;
    }
    let status = req.status.unwrap_or_else(|| "draft".to_string());
    validate_status(&status)?;

    let job: JobRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO jobs
            (id, title, description, department, location, employment_type,
             salary_min, salary_max, responsibilities, qualifications,
             is_remote, status, posted_by, closing_date, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&title)
    .bind(&description)
    .bind(&department)
    .bind(&req.location)
    .bind(&req.employment_type)
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(&responsibilities)
    .bind(&qualifications)
    .bind(req.is_remote.unwrap_or(false))
    .bind(&status)
    .bind(admin.id)
    .bind(req.closing_date)
    .bind(req.tags.unwrap_or_default())
    .fetch_one(&state.db)
    .await?;

    info!(job_id = %job.id, admin_id = %admin.id, "Job created");
    Ok((StatusCode::CREATED, Json(job)))
}

#[derive(Debug, Deserialize)]
pub struct PublicJobsQuery {
    pub department: Option<String>,
    pub q: Option<String>,
    pub tags: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/jobs/public
pub async fn handle_list_public_jobs(
    State(state): State<AppState>,
    Query(params): Query<PublicJobsQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let window = page_window(params.page, params.limit, 10, state.config.max_page_size);
    let tags: Option<Vec<String>> = params.tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    let jobs: Vec<JobRow> = sqlx::query_as(&format!(
        r#"
        SELECT {JOB_COLUMNS} FROM jobs
        WHERE status = 'open'
          AND ($1::text IS NULL OR department = $1)
          AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
          AND ($3::text[] IS NULL OR tags && $3)
        ORDER BY posted_at DESC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(&params.department)
    .bind(&params.q)
    .bind(&tags)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}

#[derive(Debug, Deserialize)]
pub struct AdminJobsQuery {
    pub status: Option<String>,
    pub department: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/jobs (admin) — all statuses, most recently updated first.
pub async fn handle_list_admin_jobs(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Query(params): Query<AdminJobsQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let window = page_window(params.page, params.limit, 20, state.config.max_page_size);

    let jobs: Vec<JobRow> = sqlx::query_as(&format!(
        r#"
        SELECT {JOB_COLUMNS} FROM jobs
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL OR department = $2)
        ORDER BY updated_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(&params.status)
    .bind(&params.department)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}

/// GET /api/jobs/:id — public sees only open postings; admin sees all.
/// Missing and not-open answer identically with 404.
pub async fn handle_get_job(
    State(state): State<AppState>,
    OptionalAdmin(admin): OptionalAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job: Option<JobRow> =
        sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&state.db)
            .await?;

    let job = job.ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    if admin.is_none() && !visible_to_public(&job.status) {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    Ok(Json(job))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub responsibilities: Option<Vec<String>>,
    pub qualifications: Option<Vec<String>>,
    pub is_remote: Option<bool>,
    pub status: Option<String>,
    pub closing_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

/// PUT /api/jobs/:id (admin) — partial update; absent fields are kept.
pub async fn handle_update_job(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    if let Some(r) = &req.responsibilities {
        if r.is_empty() {
            return Err(AppError::Validation(
                "At least one responsibility is required".to_string(),
            ));
        }
    }
    if let Some(q) = &req.qualifications {
        if q.is_empty() {
            return Err(AppError::Validation(
                "At least one qualification is required".to_string(),
            ));
        }
    }
    if let Some(et) = req.employment_type.as_deref() {
        validate_employment_type(et)?;
    }
    if let Some(status) = req.status.as_deref() {
        validate_status(status)?;
    }

    let job: Option<JobRow> = sqlx::query_as(&format!(
        r#"
        UPDATE jobs
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            department = COALESCE($3, department),
            location = COALESCE($4, location),
            employment_type = COALESCE($5, employment_type),
            salary_min = COALESCE($6, salary_min),
            salary_max = COALESCE($7, salary_max),
            responsibilities = COALESCE($8, responsibilities),
            qualifications = COALESCE($9, qualifications),
            is_remote = COALESCE($10, is_remote),
            status = COALESCE($11, status),
            closing_date = COALESCE($12, closing_date),
            tags = COALESCE($13, tags),
            updated_at = now()
        WHERE id = $14
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.department)
    .bind(&req.location)
    .bind(&req.employment_type)
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(&req.responsibilities)
    .bind(&req.qualifications)
    .bind(req.is_remote)
    .bind(&req.status)
    .bind(req.closing_date)
    .bind(&req.tags)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let job = job.ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    info!(job_id = %job.id, "Job updated");
    Ok(Json(job))
}

/// DELETE /api/jobs/:id (admin)
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Job not found".to_string()));
    }
    info!(job_id = %id, "Job deleted");
    Ok(Json(json!({ "message": "Job deleted" })))
}

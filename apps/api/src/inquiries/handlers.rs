use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::email::normalize_email;
use crate::errors::AppError;
use crate::models::inquiry::InquiryRow;
use crate::pagination::page_window;
use crate::state::AppState;

const INQUIRY_COLUMNS: &str =
    "id, name, email, company, project_type, message, timeline, status, note, created_at";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub message: Option<String>,
    pub timeline: Option<String>,
}

fn notification_html(inquiry: &InquiryRow) -> String {
    format!(
        "<h3>New Inquiry</h3>\
         <p><b>Name:</b> {}</p>\
         <p><b>Email:</b> {}</p>\
         <p><b>Company:</b> {}</p>\
         <p><b>Project Type:</b> {}</p>\
         <p><b>Timeline:</b> {}</p>\
         <p><b>Message:</b><br/>{}</p>",
        inquiry.name, inquiry.email, inquiry.company, inquiry.project_type, inquiry.timeline,
        inquiry.message
    )
}

/// POST /api/inquiry/submit — stores the inquiry, then queues a
/// notification email without blocking the response on delivery.
pub async fn handle_submit_inquiry(
    State(state): State<AppState>,
    Json(req): Json<SubmitInquiryRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (Some(name), Some(email), Some(company), Some(project_type), Some(message), Some(timeline)) = (
        req.name,
        req.email,
        req.company,
        req.project_type,
        req.message,
        req.timeline,
    ) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };
    if [&name, &email, &company, &project_type, &message, &timeline]
        .iter()
        .any(|v| v.is_empty())
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    let inquiry: InquiryRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO inquiries (id, name, email, company, project_type, message, timeline)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {INQUIRY_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(normalize_email(&email))
    .bind(&company)
    .bind(&project_type)
    .bind(&message)
    .bind(&timeline)
    .fetch_one(&state.db)
    .await?;

    state
        .mailer
        .notify("New Project Inquiry Received", &notification_html(&inquiry));

    info!(inquiry_id = %inquiry.id, "Inquiry submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Inquiry submitted successfully", "data": inquiry })),
    ))
}

/// GET /api/inquiry/ — all inquiries, newest first.
pub async fn handle_list_inquiries(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let inquiries: Vec<InquiryRow> = sqlx::query_as(&format!(
        "SELECT {INQUIRY_COLUMNS} FROM inquiries ORDER BY created_at DESC"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({ "count": inquiries.len(), "data": inquiries })))
}

#[derive(Debug, Deserialize)]
pub struct AdminInquiriesQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/admin/inquiries — paginated, optionally filtered by status and
/// a case-insensitive search over name/email/company/message.
pub async fn handle_admin_list_inquiries(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Query(params): Query<AdminInquiriesQuery>,
) -> Result<Json<Value>, AppError> {
    let window = page_window(params.page, params.limit, 20, state.config.max_page_size);

    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM inquiries
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL
               OR name ILIKE '%' || $2 || '%'
               OR email ILIKE '%' || $2 || '%'
               OR company ILIKE '%' || $2 || '%'
               OR message ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(&params.status)
    .bind(&params.search)
    .fetch_one(&state.db)
    .await?;

    let data: Vec<InquiryRow> = sqlx::query_as(&format!(
        r#"
        SELECT {INQUIRY_COLUMNS} FROM inquiries
        WHERE ($1::text IS NULL OR status = $1)
          AND ($2::text IS NULL
               OR name ILIKE '%' || $2 || '%'
               OR email ILIKE '%' || $2 || '%'
               OR company ILIKE '%' || $2 || '%'
               OR message ILIKE '%' || $2 || '%')
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(&params.status)
    .bind(&params.search)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "count": count,
        "page": window.page,
        "limit": window.limit,
        "data": data
    })))
}

/// GET /api/admin/inquiries/:id
pub async fn handle_admin_get_inquiry(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let inquiry: Option<InquiryRow> = sqlx::query_as(&format!(
        "SELECT {INQUIRY_COLUMNS} FROM inquiries WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let inquiry = inquiry.ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(json!({ "data": inquiry })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateInquiryRequest {
    pub status: Option<String>,
    pub note: Option<String>,
}

/// PUT /api/admin/inquiries/:id — only status and note are mutable.
pub async fn handle_admin_update_inquiry(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInquiryRequest>,
) -> Result<Json<Value>, AppError> {
    let updated: Option<InquiryRow> = sqlx::query_as(&format!(
        r#"
        UPDATE inquiries
        SET status = COALESCE($1, status),
            note = COALESCE($2, note)
        WHERE id = $3
        RETURNING {INQUIRY_COLUMNS}
        "#
    ))
    .bind(&req.status)
    .bind(&req.note)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let updated = updated.ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(json!({ "data": updated })))
}

/// DELETE /api/admin/inquiries/:id
pub async fn handle_admin_delete_inquiry(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    sqlx::query("DELETE FROM inquiries WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    Ok(Json(json!({ "message": "Deleted" })))
}

/// GET /api/admin/inquiries/dashboard/stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
) -> Result<Json<Value>, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inquiries")
        .fetch_one(&state.db)
        .await?;
    let unread: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inquiries WHERE status <> 'read'")
        .fetch_one(&state.db)
        .await?;
    let archived: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inquiries WHERE status = 'archived'")
            .fetch_one(&state.db)
            .await?;
    let recent: Vec<InquiryRow> = sqlx::query_as(&format!(
        "SELECT {INQUIRY_COLUMNS} FROM inquiries ORDER BY created_at DESC LIMIT 5"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "total": total,
        "unread": unread,
        "archived": archived,
        "recent": recent
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_notification_html_carries_inquiry_fields() {
        let inquiry = InquiryRow {
            id: Uuid::new_v4(),
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            company: "Navy".to_string(),
            project_type: "Compiler".to_string(),
            message: "Need a compiler built.".to_string(),
            timeline: "Q4".to_string(),
            status: "unread".to_string(),
            note: None,
            created_at: Utc::now(),
        };
        let html = notification_html(&inquiry);
        for fragment in ["Grace Hopper", "grace@example.com", "Navy", "Compiler", "Q4"] {
            assert!(html.contains(fragment), "missing {fragment}");
        }
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password, AdminAuth};
use crate::email::normalize_email;
use crate::errors::AppError;
use crate::models::admin::{AdminRow, AdminResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

/// POST /api/admin/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let (Some(username), Some(email), Some(password)) = (req.username, req.email, req.password)
    else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    let email = normalize_email(&email);

    let existing: Option<AdminRow> = sqlx::query_as(
        "SELECT id, username, email, password_hash, created_at FROM admins WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Admin already exists".to_string()));
    }

    let password_hash = hash_password(&password)?;
    let admin: AdminRow = sqlx::query_as(
        r#"
        INSERT INTO admins (id, username, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, password_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    let token = issue_token(admin.id, &state.config.jwt_secret)?;
    info!(admin_id = %admin.id, "Admin registered");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "Admin registered".to_string(),
            token,
        }),
    ))
}

/// POST /api/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    let email = normalize_email(&email);

    let admin: Option<AdminRow> = sqlx::query_as(
        "SELECT id, username, email, password_hash, created_at FROM admins WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;

    // One failure path for both unknown email and bad password.
    let admin = admin.ok_or(AppError::Unauthorized)?;
    if !verify_password(&password, &admin.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = issue_token(admin.id, &state.config.jwt_secret)?;
    info!(admin_id = %admin.id, "Admin logged in");

    Ok(Json(TokenResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// GET /api/admin/me
pub async fn handle_me(AdminAuth(admin): AdminAuth) -> Json<AdminResponse> {
    Json(AdminResponse::from(admin))
}

/// GET /api/admin/users
pub async fn handle_list_admins(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
) -> Result<Json<Value>, AppError> {
    let admins: Vec<AdminRow> = sqlx::query_as(
        "SELECT id, username, email, password_hash, created_at FROM admins ORDER BY created_at",
    )
    .fetch_all(&state.db)
    .await?;

    let data: Vec<AdminResponse> = admins.into_iter().map(AdminResponse::from).collect();
    Ok(Json(json!({ "count": data.len(), "data": data })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// PUT /api/admin/users/:id
pub async fn handle_update_admin(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAdminRequest>,
) -> Result<Json<Value>, AppError> {
    let email = req.email.map(|e| normalize_email(&e));
    let updated: Option<AdminRow> = sqlx::query_as(
        r#"
        UPDATE admins
        SET username = COALESCE($1, username),
            email = COALESCE($2, email)
        WHERE id = $3
        RETURNING id, username, email, password_hash, created_at
        "#,
    )
    .bind(req.username)
    .bind(email)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    let updated = updated.ok_or_else(|| AppError::NotFound(format!("Admin {id} not found")))?;
    Ok(Json(json!({ "data": AdminResponse::from(updated) })))
}

/// DELETE /api/admin/users/:id
pub async fn handle_delete_admin(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    Ok(Json(json!({ "message": "Admin deleted" })))
}

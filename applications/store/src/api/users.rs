/// User and token API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use segue_core::AccessToken;
use segue_storage::users::StoredUser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PutTokenRequest {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
}

/// Token as handed to the queue manager: still sealed
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub access_token: String,
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServerError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn seal(app_state: &AppState, access_token: &str) -> Result<String> {
    let sealed = app_state.cipher.seal(&AccessToken::new(access_token))?;
    Ok(sealed.as_str().to_string())
}

/// GET /api/v1/users - List the roster
pub async fn list_users(State(app_state): State<AppState>) -> Result<Json<Vec<StoredUser>>> {
    let users = segue_storage::users::get_all(&app_state.pool).await?;
    Ok(Json(users))
}

/// POST /api/v1/users/token - Create a user with their first token
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    require_non_empty("user_id", &body.user_id)?;
    require_non_empty("access_token", &body.access_token)?;

    let sealed = seal(&app_state, &body.access_token)?;
    segue_storage::users::create(&app_state.pool, &body.user_id, &sealed).await?;

    tracing::info!(user_id = %body.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user_id: body.user_id,
        }),
    ))
}

/// PUT /api/v1/users/:user_id/token - Store or replace a user's token
pub async fn put_token(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
    Json(body): Json<PutTokenRequest>,
) -> Result<Json<UserResponse>> {
    require_non_empty("access_token", &body.access_token)?;

    let sealed = seal(&app_state, &body.access_token)?;
    segue_storage::users::upsert_token(&app_state.pool, &user_id, &sealed).await?;

    tracing::debug!(user_id = %user_id, "Token updated");

    Ok(Json(UserResponse { user_id }))
}

/// GET /api/v1/users/:user_id/token - Sealed token of a user
pub async fn get_token(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<TokenResponse>> {
    let token = segue_storage::users::get_token(&app_state.pool, &user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Token for user {}", user_id)))?;

    Ok(Json(TokenResponse {
        user_id: token.user_id,
        access_token: token.access_token,
    }))
}

/// DELETE /api/v1/users/:user_id - Remove a user and their mappings
pub async fn delete_user(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<StatusCode> {
    if !segue_storage::users::delete(&app_state.pool, &user_id).await? {
        return Err(ServerError::NotFound(format!("User {}", user_id)));
    }

    tracing::info!(user_id = %user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Song mapping API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use segue_core::{find_duplicate_trigger, TrackId};
use segue_storage::mappings::StoredMapping;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateMappingRequest {
    pub trigger_song_id: String,
    pub queue_song_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateChainRequest {
    pub songs: Vec<String>,
}

/// Accepts bare ids and `spotify:track:` URIs
fn parse_track(field: &str, raw: &str) -> Result<TrackId> {
    TrackId::parse(raw)
        .ok_or_else(|| ServerError::BadRequest(format!("{} must not be empty", field)))
}

async fn require_user(app_state: &AppState, user_id: &str) -> Result<()> {
    if segue_storage::users::exists(&app_state.pool, user_id).await? {
        Ok(())
    } else {
        Err(ServerError::NotFound(format!("User {}", user_id)))
    }
}

/// GET /api/v1/users/:user_id/mappings - List a user's mappings, oldest first
pub async fn list_mappings(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<StoredMapping>>> {
    require_user(&app_state, &user_id).await?;

    let mappings = segue_storage::mappings::get_by_user(&app_state.pool, &user_id).await?;
    Ok(Json(mappings))
}

/// POST /api/v1/users/:user_id/mappings - Map a trigger song to a follow-up
pub async fn create_mapping(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
    Json(body): Json<CreateMappingRequest>,
) -> Result<(StatusCode, Json<StoredMapping>)> {
    let trigger = parse_track("trigger_song_id", &body.trigger_song_id)?;
    let queue = parse_track("queue_song_id", &body.queue_song_id)?;
    if trigger == queue {
        return Err(ServerError::BadRequest(
            "A song cannot be mapped to itself".to_string(),
        ));
    }

    require_user(&app_state, &user_id).await?;

    let mapping = segue_storage::mappings::create(
        &app_state.pool,
        &user_id,
        trigger.as_str(),
        queue.as_str(),
    )
    .await?;

    tracing::info!(
        user_id = %user_id,
        trigger = %trigger,
        queue = %queue,
        "Mapping created"
    );

    Ok((StatusCode::CREATED, Json(mapping)))
}

/// POST /api/v1/users/:user_id/mappings/chain - Map each song to the next one
pub async fn create_chain(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
    Json(body): Json<CreateChainRequest>,
) -> Result<(StatusCode, Json<Vec<StoredMapping>>)> {
    if body.songs.len() < 2 {
        return Err(ServerError::BadRequest(
            "A chain needs at least two songs".to_string(),
        ));
    }

    let songs = body
        .songs
        .iter()
        .map(|raw| parse_track("songs", raw))
        .collect::<Result<Vec<_>>>()?;

    if songs.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(ServerError::BadRequest(
            "A song cannot be mapped to itself".to_string(),
        ));
    }

    // Every song but the last becomes a trigger
    let triggers = &songs[..songs.len() - 1];
    if let Some(duplicate) = find_duplicate_trigger(triggers) {
        return Err(ServerError::Conflict(format!(
            "trigger {} appears twice in the chain",
            duplicate
        )));
    }

    require_user(&app_state, &user_id).await?;

    let ids: Vec<String> = songs.iter().map(|song| song.as_str().to_string()).collect();
    let mappings = segue_storage::mappings::create_chain(&app_state.pool, &user_id, &ids).await?;

    tracing::info!(user_id = %user_id, links = mappings.len(), "Mapping chain created");

    Ok((StatusCode::CREATED, Json(mappings)))
}

/// DELETE /api/v1/users/:user_id/mappings/:mapping_id - Remove one mapping
pub async fn delete_mapping(
    Path((user_id, mapping_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> Result<StatusCode> {
    if !segue_storage::mappings::delete(&app_state.pool, &user_id, &mapping_id).await? {
        return Err(ServerError::NotFound(format!("Mapping {}", mapping_id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

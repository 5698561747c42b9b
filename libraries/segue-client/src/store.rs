//! Client for the Segue store API.

use crate::client::{self, ServiceConfig};
use crate::error::{send_error, status_error, ClientError, Result};
use crate::types::{MappingResponse, TokenResponse, UserEntry};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use segue_core::{CollaboratorStore, SealedToken, SongMapping, TrackId, UserId};
use tracing::{debug, warn};
use url::Url;

/// Read-only client for the store holding users, sealed tokens and mappings.
pub struct StoreClient {
    http: Client,
    base_url: String,
}

impl StoreClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let (http, base_url) = client::build(&config)?;
        Ok(Self { http, base_url })
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full roster.
    pub async fn fetch_users(&self) -> Result<Vec<UserEntry>> {
        let url = format!("{}/users", self.base_url);
        debug!(url = %url, "Fetching users");

        let response = self.http.get(&url).send().await.map_err(send_error)?;

        if response.status().is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse users response: {}", e))
            })
        } else {
            Err(status_error(response).await)
        }
    }

    /// Fetch a user's sealed token. A 404 means the user has none.
    pub async fn fetch_token(&self, user_id: &str) -> Result<Option<TokenResponse>> {
        let url = self.user_url(user_id, "token")?;
        debug!(url = %url, "Fetching user token");

        let response = self.http.get(url).send().await.map_err(send_error)?;
        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse token response: {}", e))
            })?;
            Ok(Some(token))
        } else if status == StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            Err(status_error(response).await)
        }
    }

    /// Fetch all mappings of a user.
    pub async fn fetch_mappings(&self, user_id: &str) -> Result<Vec<MappingResponse>> {
        let url = self.user_url(user_id, "mappings")?;
        debug!(url = %url, "Fetching user mappings");

        let response = self.http.get(url).send().await.map_err(send_error)?;

        if response.status().is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse mappings response: {}", e))
            })
        } else {
            Err(status_error(response).await)
        }
    }

    /// `{base}/users/{user_id}/{leaf}` with the user id encoded as one segment
    fn user_url(&self, user_id: &str, leaf: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["users", user_id, leaf]);
        Ok(url)
    }
}

#[async_trait]
impl CollaboratorStore for StoreClient {
    async fn list_users(&self) -> segue_core::Result<Vec<UserId>> {
        let users = self.fetch_users().await?;
        Ok(users.into_iter().map(|u| UserId::new(u.user_id)).collect())
    }

    async fn get_user_token(&self, user_id: &UserId) -> segue_core::Result<Option<SealedToken>> {
        let token = self.fetch_token(user_id.as_str()).await?;
        Ok(token.map(|t| SealedToken::new(t.access_token)))
    }

    async fn get_user_mappings(&self, user_id: &UserId) -> segue_core::Result<Vec<SongMapping>> {
        let rows = self.fetch_mappings(user_id.as_str()).await?;

        let mappings = rows
            .into_iter()
            .filter_map(|row| {
                match (
                    TrackId::parse(&row.trigger_song_id),
                    TrackId::parse(&row.queue_song_id),
                ) {
                    (Some(trigger), Some(queue)) => Some(SongMapping::new(
                        row.id,
                        user_id.clone(),
                        trigger,
                        queue,
                    )),
                    _ => {
                        warn!(user_id = %user_id, mapping_id = %row.id, "Skipping mapping with empty track id");
                        None
                    }
                }
            })
            .collect();

        Ok(mappings)
    }
}

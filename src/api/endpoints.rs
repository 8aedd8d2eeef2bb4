use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::error::ApiFailure;
use super::pipeline::ApiClient;
use super::request::ApiRequest;

pub const SHORT_DETAILS_PATH: &str = "/api/account/short-details";
pub const EMOJI_LIST_PATH: &str = "/api/emoji/list";
pub const EMOJI_ADD_PATH: &str = "/api/emoji/add";

/// Profile summary shown in the dashboard header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub full_name: String,
    #[serde(default)]
    pub username: Option<String>,
    pub role: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Any fields the console does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserDetails {
    /// Letter shown in place of a missing profile image.
    pub fn avatar_initial(&self) -> Option<char> {
        self.full_name.trim().chars().next()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    pub uuid: String,
    pub name: String,
}

/// Emoji upload entry; `data` is the raw image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEmoji {
    pub name: String,
    pub serial: u32,
    pub data: Vec<u8>,
    #[serde(rename = "type")]
    pub mime_type: String,
}

pub struct AccountService;

impl AccountService {
    pub async fn short_details(client: &ApiClient, user_id: &str) -> Result<UserDetails, ApiFailure> {
        client
            .call_json(ApiRequest::post(SHORT_DETAILS_PATH, json!({ "user_id": user_id })))
            .await
    }
}

pub struct EmojiService;

impl EmojiService {
    pub async fn list(client: &ApiClient) -> Result<Vec<Emoji>, ApiFailure> {
        client.call_json(ApiRequest::get(EMOJI_LIST_PATH)).await
    }

    /// Upload emojis; returns the server's confirmation message, if any.
    pub async fn add(client: &ApiClient, emojis: Vec<NewEmoji>) -> Result<Option<String>, ApiFailure> {
        let response = client
            .call(ApiRequest::post(EMOJI_ADD_PATH, json!({ "emojis": emojis })))
            .await;
        let message = response.message().map(str::to_string);
        response.into_result()?;
        Ok(message)
    }
}

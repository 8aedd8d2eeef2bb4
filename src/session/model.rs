use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials of the signed-in account.
///
/// Serializes to the persisted record layout: `access_token`,
/// `access_token_valid_till` (epoch milliseconds), `refresh_token`,
/// `user_id` and `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(
        rename = "access_token_valid_till",
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token_expiry: Option<DateTime<Utc>>,
    pub refresh_token: String,
    pub user_id: String,
    pub role: String,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user_id: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            access_token_expiry: None,
            refresh_token: refresh_token.into(),
            user_id: user_id.into(),
            role: role.into(),
        }
    }

    /// Copy of this session carrying a freshly issued access token.
    /// The refresh token and identity are kept.
    pub fn with_renewed_access_token(
        &self,
        access_token: impl Into<String>,
        expiry: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            access_token_expiry: expiry,
            ..self.clone()
        }
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.access_token_expiry = Some(expiry);
        self
    }

    /// True when the expiry is known and already passed. An unknown expiry is
    /// never considered expired; the server decides with a 401.
    pub fn is_access_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_token_expiry.is_some_and(|expiry| expiry <= now)
    }
}

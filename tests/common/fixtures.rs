//! Canned sessions and response bodies

use serde_json::{json, Value};
use uniman::Session;

pub const USER_ID: &str = "user-42";

/// Administrator session holding `access_token`.
pub fn admin_session(access_token: &str) -> Session {
    Session::new(access_token, "refresh-42", USER_ID, "Administrator")
}

pub fn emoji_list() -> Value {
    json!([
        {"uuid": "0b8e", "name": "smile"},
        {"uuid": "7f21", "name": "party"},
    ])
}

pub fn refreshed_token(token: &str) -> Value {
    json!({"access_token": token, "access_token_valid_till": 4_102_444_800_000_i64})
}

pub fn admin_details() -> Value {
    json!({
        "full_name": "Fanari Admin",
        "username": "fanari",
        "role": "Administrator",
        "profile_image": null,
    })
}

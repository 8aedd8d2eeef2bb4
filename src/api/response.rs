use serde_json::Value;

use super::error::{ApiFailure, FailureKind};

/// Result of [`ApiClient::call`](super::ApiClient::call). Data exists only on
/// success.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Success {
        status_code: u16,
        data: Value,
        message: Option<String>,
    },
    Failure(ApiFailure),
}

impl ApiResponse {
    /// Success with the server's `message` lifted out of the body when it is
    /// a non-empty string.
    pub fn success(status_code: u16, data: Value) -> Self {
        let message = data
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        ApiResponse::Success {
            status_code,
            data,
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiResponse::Success { status_code, .. } => Some(*status_code),
            ApiResponse::Failure(failure) => failure.status_code,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ApiResponse::Success { message, .. } => message.as_deref(),
            ApiResponse::Failure(failure) => Some(&failure.message),
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success { data, .. } => Some(data),
            ApiResponse::Failure(_) => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn into_result(self) -> Result<Value, ApiFailure> {
        match self {
            ApiResponse::Success { data, .. } => Ok(data),
            ApiResponse::Failure(failure) => Err(failure),
        }
    }
}

impl From<ApiFailure> for ApiResponse {
    fn from(failure: ApiFailure) -> Self {
        ApiResponse::Failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_lifts_string_message() {
        let response = ApiResponse::success(200, json!({"message": "added"}));
        assert_eq!(response.message(), Some("added"));

        let list = ApiResponse::success(200, json!([{"uuid": "1"}]));
        assert_eq!(list.message(), None);
        assert_eq!(list.data().and_then(|d| d.as_array()).map(Vec::len), Some(1));
    }

    #[test]
    fn failure_has_no_data() {
        let response: ApiResponse = ApiFailure::transport().into();
        assert!(response.data().is_none());
        assert_eq!(response.failure_kind(), Some(FailureKind::Transport));
        assert_eq!(response.status_code(), None);
    }
}

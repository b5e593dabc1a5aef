use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

/// `{"type": "error", "error": {...}}` body returned on non-2xx responses.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

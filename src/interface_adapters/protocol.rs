use serde::{Deserialize, Serialize};

// Request payload for exchanging a third-party provider token.
#[derive(Debug, Serialize)]
pub struct ProviderTokenRequest<'a> {
    pub token: &'a str,
}

// Error envelope returned by the identity service.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

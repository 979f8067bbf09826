use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IssueTokenRequest {
    /// Opaque client identifier the session is bound to
    #[validate(length(min = 1, max = 255))]
    pub guid: String,

    /// Address for origin-change notices
    #[validate(email, length(max = 320))]
    pub email: String,
}

/// Body returned by both token endpoints; the refresh secret travels in a cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub access_token: String,
}

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub status: Option<String>,
}

/// Admin PATCH body. A missing `reply` leaves it alone, `null` or `""` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct PatchCommentRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub reply: Option<Option<String>>,
}

fn present<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub admin: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_missing_null_and_text() {
        let p: PatchCommentRequest = serde_json::from_str(r#"{"status":"approved"}"#).unwrap();
        assert_eq!(p.status.as_deref(), Some("approved"));
        assert_eq!(p.reply, None);

        let p: PatchCommentRequest = serde_json::from_str(r#"{"reply":null}"#).unwrap();
        assert_eq!(p.reply, Some(None));

        let p: PatchCommentRequest = serde_json::from_str(r#"{"reply":"Thanks"}"#).unwrap();
        assert_eq!(p.reply, Some(Some("Thanks".to_string())));
        assert_eq!(p.status, None);
    }
}

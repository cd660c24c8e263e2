//! Session Validator boundary: confirms a user has an active session.
//! The engine consumes this read-only, before taking any partition lock.

use async_trait::async_trait;

use crate::engine::BookingError;

#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Ok(()) iff `user_id` currently holds a valid session. Any failure
    /// fails closed: the reservation attempt is rejected.
    async fn validate(&self, user_id: i64) -> Result<(), BookingError>;
}

/// Talks to the user service over HTTP: `GET {base}/user/{userID}`.
/// 2xx means a live session; 5xx and transport errors are dependency
/// failures the caller may retry; anything else is an expired or unknown
/// session.
pub struct HttpSessionValidator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionValidator {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SessionValidator for HttpSessionValidator {
    async fn validate(&self, user_id: i64) -> Result<(), BookingError> {
        let url = format!("{}/user/{user_id}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BookingError::Dependency(format!("session validator: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else if status.is_server_error() {
            Err(BookingError::Dependency(format!(
                "session validator returned {status}"
            )))
        } else {
            Err(BookingError::Auth("session expired or unknown user".into()))
        }
    }
}

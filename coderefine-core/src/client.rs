//! HTTP client for the CodeRefine backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::session::SessionStore;
use crate::types::{
    AuthResponse, ConversionResult, ConvertRequest, LoginRequest, RegisterRequest, ReviewDetail,
    ReviewHistoryRecord, ReviewRequest, ReviewResult, Session, Stats, UserProfile,
};

/// Default request bound. Reviews run a hosted model and routinely take tens
/// of seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default backend root, matching the dev server's `/api` prefix.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Client for the backend REST API.
///
/// Attaches the bearer token of the shared [`SessionStore`] to every request
/// and clears that store when the server rejects the token.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, session: Arc<SessionStore>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Performs one request and decodes a JSON answer.
    ///
    /// The token is read at send time, so a request issued after a forced
    /// logout goes out anonymous.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Timeout`] when no answer arrives within the timeout.
    /// - [`ApiError::SessionExpired`] on a 401 to a request that carried a
    ///   token. The session store is cleared first.
    /// - [`ApiError::Request`] for every other non-success status, transport
    ///   failure or undecodable body.
    pub async fn call<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let generation = self.session.generation();
        let token = self.session.token();

        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, authenticated = token.is_some(), "api request");
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await.map_err(map_transport_error)?;
            let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            return serde_json::from_slice(body).map_err(|e| {
                tracing::warn!(path, "undecodable response body: {e}");
                ApiError::Request {
                    status: Some(status.as_u16()),
                    message: "The server sent an unexpected response".to_owned(),
                }
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);

        if status == StatusCode::UNAUTHORIZED && token.is_some() {
            self.session.clear_if_generation(generation).await;
            tracing::warn!(path, "authorization rejected, session cleared");
            return Err(ApiError::SessionExpired { message });
        }

        tracing::warn!(%method, path, status = status.as_u16(), "api request failed: {message}");
        Err(ApiError::Request { status: Some(status.as_u16()), message })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        self.call(Method::POST, path, Some(body)).await
    }

    /// Exchanges credentials for a session and saves it.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::call`]. A 401 here is an [`ApiError::Request`] (wrong
    /// password) since no token was sent.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let resp: AuthResponse = self.post("/auth/login", &LoginRequest { email, password }).await?;
        let session = resp.into_session();
        self.session.save(session.clone()).await;
        Ok(session)
    }

    /// Creates an account and saves the resulting session.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Session> {
        let resp: AuthResponse = self
            .post("/auth/register", &RegisterRequest { username, email, password })
            .await?;
        let session = resp.into_session();
        self.session.save(session.clone()).await;
        Ok(session)
    }

    pub async fn me(&self) -> Result<UserProfile> {
        self.get("/auth/me").await
    }

    pub async fn submit_review(&self, code: &str, language: &str) -> Result<ReviewResult> {
        self.post("/review", &ReviewRequest { code, language }).await
    }

    pub async fn list_reviews(&self, limit: usize) -> Result<Vec<ReviewHistoryRecord>> {
        self.get(&format!("/reviews?limit={limit}")).await
    }

    pub async fn get_review(&self, id: i64) -> Result<ReviewDetail> {
        self.get(&format!("/reviews/{id}")).await
    }

    /// Deletes a stored review. The confirmation body is not interpreted.
    pub async fn delete_review(&self, id: i64) -> Result<()> {
        let _: serde_json::Value =
            self.call::<_, ()>(Method::DELETE, &format!("/reviews/{id}"), None).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.get("/stats").await
    }

    pub async fn convert(&self, code: &str, target_language: &str) -> Result<ConversionResult> {
        self.post("/convert", &ConvertRequest { code, target_language }).await
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        tracing::warn!("request timed out: {e}");
        ApiError::Timeout
    } else if e.is_connect() {
        tracing::warn!("connection failed: {e}");
        ApiError::transport("Could not reach the server. Is the backend running?")
    } else {
        tracing::warn!("request failed: {e}");
        ApiError::transport(format!("Request failed: {e}"))
    }
}

/// Extracts the human-readable message from an error body.
///
/// FastAPI puts it under `detail` (a string, or a list of validation entries
/// with `msg`); `message` is accepted as well.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        let detail = match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .find_map(|i| i.get("msg").and_then(|m| m.as_str()))
                .map(str::to_owned),
            _ => None,
        };
        detail.or_else(|| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
    });
    from_json
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_detail() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"detail":"Code cannot be empty"}"#);
        assert_eq!(msg, "Code cannot be empty");
    }

    #[test]
    fn error_message_reads_validation_list() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#;
        assert_eq!(error_message(StatusCode::UNPROCESSABLE_ENTITY, body), "field required");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "Request failed with status 502"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"detail":""}"#),
            "Request failed with status 404"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new(
            "http://localhost:8000/api/",
            DEFAULT_TIMEOUT,
            Arc::new(SessionStore::in_memory()),
        );
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }
}

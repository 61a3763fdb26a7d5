use crate::redact::redact_bearer_token;
use crate::types::{LoginResponse, Scope, Secret, SignupPayload};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Response;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message for the UI: the server-provided one when the
    /// API answered with an error body, otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pulls the `message` field out of a JSON error body, if there is one.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("message")?.as_str()?.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

pub(crate) fn build_headers(token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            headers.insert(AUTHORIZATION, value);
        }
    }
    headers
}

async fn error_from_response(res: Response) -> ApiError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    ApiError::Status {
        status,
        message: server_message(&body).unwrap_or_default(),
    }
}

pub struct SecretsApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SecretsApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn signup(&self, payload: &SignupPayload) -> Result<String, ApiError> {
        let res = self
            .http
            .post(self.url("/users/signup"))
            .headers(build_headers(None))
            .json(payload)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(error_from_response(res).await);
        }

        let body = res.text().await?;
        Ok(server_message(&body).unwrap_or_else(|| "Signup successful.".to_string()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let res = self
            .http
            .post(self.url("/users/login"))
            .headers(build_headers(None))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(error_from_response(res).await);
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn list_secrets(
        &self,
        scope: Scope,
        token: Option<&str>,
    ) -> Result<Vec<Secret>, ApiError> {
        let res = self
            .http
            .get(self.url(scope.path()))
            .headers(build_headers(token))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(error_from_response(res).await);
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn create_secret(&self, text: &str, token: &str) -> Result<Secret, ApiError> {
        let res = self
            .http
            .post(self.url("/secrets/create"))
            .headers(build_headers(Some(token)))
            .json(&json!({ "text": text }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(error_from_response(res).await);
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn delete_secret(&self, id: &str, token: &str) -> Result<String, ApiError> {
        let res = self
            .http
            .delete(self.url(&format!("/secrets/{}", urlencoding::encode(id))))
            .headers(build_headers(Some(token)))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(error_from_response(res).await);
        }

        let body = res.text().await?;
        Ok(server_message(&body).unwrap_or_else(|| "Secret deleted.".to_string()))
    }

    pub async fn get_secret(&self, id: &str, token: &str) -> Result<Secret, ApiError> {
        let res = self
            .http
            .get(self.url(&format!("/secrets/{}", urlencoding::encode(id))))
            .headers(build_headers(Some(token)))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(error_from_response(res).await);
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Redacted description of an API failure for diagnostics.
pub(crate) fn describe_for_log(err: &ApiError) -> String {
    redact_bearer_token(&err.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_carries_exact_token() {
        let headers = build_headers(Some("T1"));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer T1");
    }

    #[test]
    fn anonymous_request_has_no_authorization_header() {
        let headers = build_headers(None);
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn server_message_extracted_when_present() {
        assert_eq!(
            server_message(r#"{"message":"Secret not found"}"#),
            Some("Secret not found".to_string())
        );
    }

    #[test]
    fn server_message_none_for_blank_or_missing() {
        assert_eq!(server_message(r#"{"message":"   "}"#), None);
        assert_eq!(server_message(r#"{"error":"nope"}"#), None);
        assert_eq!(server_message("not json"), None);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = SecretsApiClient::new("http://localhost:4000/api/").unwrap();
        assert_eq!(client.url("/secrets"), "http://localhost:4000/api/secrets");
    }

    #[test]
    fn scope_paths_match_remote_routes() {
        let client = SecretsApiClient::new("http://localhost:4000/api").unwrap();
        assert_eq!(client.url(Scope::All.path()), "http://localhost:4000/api/secrets");
        assert_eq!(
            client.url(Scope::Mine.path()),
            "http://localhost:4000/api/secrets/my-secrets"
        );
    }

    #[test]
    fn status_error_prefers_server_message() {
        let err = ApiError::Status {
            status: 404,
            message: "Secret not found".to_string(),
        };
        assert_eq!(err.user_message("Failed to view secret."), "Secret not found");
        assert_eq!(err.status(), Some(404));

        let bare = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(bare.user_message("Failed to view secret."), "Failed to view secret.");
    }
}

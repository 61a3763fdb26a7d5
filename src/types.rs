use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing scope for the secrets feed. `Mine` is owner-filtered server-side
/// and always requires a credential token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    All,
    Mine,
}

impl Scope {
    pub fn requires_token(self) -> bool {
        matches!(self, Scope::Mine)
    }

    pub fn path(self) -> &'static str {
        match self {
            Scope::All => "/secrets",
            Scope::Mine => "/secrets/my-secrets",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Secret {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Profile fields collected at signup. Cached locally for display only; the
/// wire names are already snake_case so no renames are needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub f_name: String,
    pub l_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupPayload {
    pub f_name: String,
    pub l_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub authenticated: bool,
    pub keyring_available: bool,
    pub profile: Option<UserProfile>,
}

/// In-memory view state mirrored to every webview window. The list keeps the
/// API's returned order, with locally created secrets prepended. `fetch_seq`
/// tags the most recently issued list fetch so late responses for a
/// superseded scope can be discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsViewState {
    pub scope: Scope,
    pub secrets: Vec<Secret>,
    pub selected: Option<Secret>,
    pub compose_text: String,
    pub loading: bool,
    pub last_updated_at: Option<String>,
    #[serde(skip)]
    pub fetch_seq: u64,
}

impl Default for SecretsViewState {
    fn default() -> Self {
        Self {
            scope: Scope::All,
            secrets: vec![],
            selected: None,
            compose_text: String::new(),
            loading: false,
            last_updated_at: None,
            fetch_seq: 0,
        }
    }
}

/// What a window actually renders: the raw view state plus fields derived
/// from it and the session (the compose box only shows on the authenticated
/// public feed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    #[serde(flatten)]
    pub view: SecretsViewState,
    pub compose_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpcErrorCode {
    Validation,
    Unauthorized,
    NotFound,
    Network,
    Keyring,
    Unknown,
}

impl IpcErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Network => "network",
            Self::Keyring => "keyring",
            Self::Unknown => "unknown",
        }
    }
}

impl From<IpcErrorCode> for String {
    fn from(code: IpcErrorCode) -> Self {
        code.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcResult<T> {
    Ok { ok: bool, value: T },
    Err { ok: bool, error: IpcError },
}

impl<T> IpcResult<T> {
    pub fn ok(value: T) -> Self {
        Self::Ok { ok: true, value }
    }

    pub fn err(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Err {
            ok: false,
            error: IpcError {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

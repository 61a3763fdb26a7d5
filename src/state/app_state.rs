use super::SessionManager;
use crate::api::{describe_for_log, ApiError, SecretsApiClient};
use crate::settings::SettingsStore;
use crate::types::{
    IpcErrorCode, IpcResult, Scope, Secret, SecretsViewState, SessionState, UserProfile,
    ViewSnapshot,
};
use crate::view;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, EventTarget, Runtime};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Cross-window signal that the persisted session changed. Carries no
/// payload; listeners re-read the session themselves.
const SESSION_EVENT: &str = "session:changed";
const VIEW_EVENT: &str = "secrets:updated";

pub struct AppState<R: Runtime> {
    pub settings: SettingsStore<R>,
    pub session: SessionManager,
    pub api: Arc<SecretsApiClient>,
    pub view: Arc<Mutex<SecretsViewState>>,
}

impl<R: Runtime> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            session: self.session.clone(),
            api: self.api.clone(),
            view: self.view.clone(),
        }
    }
}

fn error_code(err: &ApiError) -> IpcErrorCode {
    match err.status() {
        Some(401) | Some(403) => IpcErrorCode::Unauthorized,
        Some(404) => IpcErrorCode::NotFound,
        Some(400) | Some(422) => IpcErrorCode::Validation,
        Some(_) => IpcErrorCode::Unknown,
        None => IpcErrorCode::Network,
    }
}

impl<R: Runtime> AppState<R> {
    async fn snapshot(&self) -> ViewSnapshot {
        let view = self.view.lock().await.clone();
        let authenticated = self.session.token().await.is_some();
        ViewSnapshot {
            compose_visible: view::compose_visible(view.scope, authenticated),
            view,
        }
    }

    async fn emit_view(&self, app: &AppHandle<R>) {
        let snapshot = self.snapshot().await;
        let _ = app.emit_to(EventTarget::any(), VIEW_EVENT, snapshot);
    }

    fn emit_session_changed(&self, app: &AppHandle<R>) {
        let _ = app.emit_to(EventTarget::any(), SESSION_EVENT, ());
    }

    pub async fn session_state(&self) -> SessionState {
        let authenticated = self.session.token().await.is_some();
        SessionState {
            authenticated,
            keyring_available: self.session.is_available(),
            profile: authenticated.then(|| self.settings.user_profile()).flatten(),
        }
    }

    /// Installs a validated session: token into the keyring, profile into the
    /// settings store, then the cross-window signal. No network effect; the
    /// caller has already validated the token against the API.
    pub async fn set_session(&self, app: &AppHandle<R>, token: &str, profile: &UserProfile) -> bool {
        let persisted = self.session.store(token).await.is_ok();
        if !persisted {
            warn!("keyring write failed; session is held in memory only");
        }
        self.settings.set_user_profile(profile);
        self.emit_session_changed(app);
        persisted
    }

    /// Drops the session and reverts the view to the anonymous default scope.
    pub async fn clear_session(&self, app: &AppHandle<R>) {
        self.session.clear().await;
        self.settings.clear_user_profile();
        {
            let mut view = self.view.lock().await;
            view::reset_for_logout(&mut view);
        }
        self.emit_session_changed(app);
    }

    /// One list fetch for the requested scope. The response is applied only
    /// if no newer fetch was issued while it was in flight.
    pub async fn refresh_secrets(&self, app: &AppHandle<R>, scope: Scope) -> IpcResult<()> {
        let token = self.session.token().await;
        if scope.requires_token() && token.is_none() {
            return IpcResult::err(
                IpcErrorCode::Validation,
                "Log in to view your secrets.",
            );
        }

        let tag = {
            let mut view = self.view.lock().await;
            view::begin_fetch(&mut view, scope)
        };
        self.emit_view(app).await;

        match self.api.list_secrets(scope, token.as_deref()).await {
            Ok(secrets) => {
                let applied = {
                    let mut view = self.view.lock().await;
                    view::finish_fetch_ok(&mut view, tag, secrets)
                };
                if applied {
                    self.emit_view(app).await;
                } else {
                    debug!(scope = ?scope, "discarding list response for superseded fetch");
                }
                IpcResult::ok(())
            }
            Err(err) => {
                let current = {
                    let view = self.view.lock().await;
                    view::finish_fetch_err(&view, tag)
                };
                warn!(error = %describe_for_log(&err), "failed to fetch secrets");
                if !current {
                    return IpcResult::ok(());
                }
                IpcResult::err(error_code(&err), err.user_message("Failed to load secrets."))
            }
        }
    }

    pub async fn create_secret(&self, app: &AppHandle<R>, text: String) -> IpcResult<Secret> {
        let Some(clean) = view::normalized_secret_text(&text) else {
            return IpcResult::err(IpcErrorCode::Validation, "Secret text must not be empty.");
        };
        let Some(token) = self.session.token().await else {
            return IpcResult::err(IpcErrorCode::Unauthorized, "Log in to share a secret.");
        };

        {
            let mut view = self.view.lock().await;
            if view.loading {
                return IpcResult::err(
                    IpcErrorCode::Validation,
                    "Another submission is still in flight.",
                );
            }
            view.loading = true;
            view.compose_text = clean.clone();
        }
        self.emit_view(app).await;

        let result = self.api.create_secret(&clean, &token).await;

        let out = {
            let mut view = self.view.lock().await;
            view.loading = false;
            match result {
                Ok(secret) => {
                    view::apply_created(&mut view, secret.clone());
                    IpcResult::ok(secret)
                }
                Err(err) => {
                    // Submitted text stays in the compose box for retry.
                    warn!(error = %describe_for_log(&err), "failed to create secret");
                    IpcResult::err(error_code(&err), err.user_message("Failed to share secret."))
                }
            }
        };
        self.emit_view(app).await;
        out
    }

    pub async fn delete_secret(&self, app: &AppHandle<R>, id: String) -> IpcResult<String> {
        let Some(token) = self.session.token().await else {
            return IpcResult::err(IpcErrorCode::Unauthorized, "Log in to delete a secret.");
        };

        {
            let mut view = self.view.lock().await;
            if !view::contains_id(&view, &id) {
                return IpcResult::err(
                    IpcErrorCode::NotFound,
                    "That secret is not in the current list.",
                );
            }
            if view.loading {
                return IpcResult::err(
                    IpcErrorCode::Validation,
                    "Another submission is still in flight.",
                );
            }
            view.loading = true;
        }
        self.emit_view(app).await;

        let result = self.api.delete_secret(&id, &token).await;

        let out = {
            let mut view = self.view.lock().await;
            view.loading = false;
            match result {
                Ok(message) => {
                    view::remove_by_id(&mut view, &id);
                    IpcResult::ok(message)
                }
                Err(err) => {
                    warn!(error = %describe_for_log(&err), "failed to delete secret");
                    IpcResult::err(error_code(&err), err.user_message("Failed to delete secret."))
                }
            }
        };
        self.emit_view(app).await;
        out
    }

    pub async fn view_detail(&self, app: &AppHandle<R>, id: String) -> IpcResult<Secret> {
        let Some(token) = self.session.token().await else {
            return IpcResult::err(IpcErrorCode::Unauthorized, "Log in to view a secret.");
        };

        match self.api.get_secret(&id, &token).await {
            Ok(secret) => {
                {
                    let mut view = self.view.lock().await;
                    view.selected = Some(secret.clone());
                }
                self.emit_view(app).await;
                IpcResult::ok(secret)
            }
            Err(err) => {
                // Selected-secret state is left exactly as it was.
                warn!(error = %describe_for_log(&err), "failed to view secret");
                IpcResult::err(error_code(&err), err.user_message("Failed to view secret."))
            }
        }
    }

    pub async fn close_detail(&self, app: &AppHandle<R>) {
        {
            let mut view = self.view.lock().await;
            view.selected = None;
        }
        self.emit_view(app).await;
    }

    pub async fn current_view(&self) -> ViewSnapshot {
        self.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            status: code,
            message: String::new(),
        }
    }

    #[test]
    fn http_statuses_map_to_ipc_codes() {
        assert_eq!(error_code(&status(401)), IpcErrorCode::Unauthorized);
        assert_eq!(error_code(&status(403)), IpcErrorCode::Unauthorized);
        assert_eq!(error_code(&status(404)), IpcErrorCode::NotFound);
        assert_eq!(error_code(&status(400)), IpcErrorCode::Validation);
        assert_eq!(error_code(&status(422)), IpcErrorCode::Validation);
        assert_eq!(error_code(&status(500)), IpcErrorCode::Unknown);
    }
}

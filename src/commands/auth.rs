use crate::api::describe_for_log;
use crate::state::AppState;
use crate::types::{IpcError, IpcErrorCode, IpcResult, Scope, SessionState, SignupPayload};
use tauri::{AppHandle, Runtime, State};
use tracing::warn;

type CommandResult<T> = Result<T, IpcError>;

/// All signup fields are required; checked before any network call.
fn validate_signup(payload: &SignupPayload) -> Result<(), &'static str> {
    let fields = [
        (payload.f_name.trim(), "First name is required."),
        (payload.l_name.trim(), "Last name is required."),
        (payload.email.trim(), "Email is required."),
        (payload.password.trim(), "Password is required."),
        (payload.phone_number.trim(), "Phone number is required."),
        (payload.address.trim(), "Address is required."),
    ];
    for (value, message) in fields {
        if value.is_empty() {
            return Err(message);
        }
    }
    Ok(())
}

/// Outcome of a login whose token may not have reached durable storage. The
/// session is installed either way, but a failed keyring write is reported
/// with the keyring code so the user knows it lives in this process only.
fn login_outcome(persisted: bool, session: SessionState) -> IpcResult<SessionState> {
    if persisted {
        IpcResult::ok(session)
    } else {
        IpcResult::err(
            IpcErrorCode::Keyring,
            "Signed in, but the OS keychain/secret service is unavailable; \
             the session will not survive a restart.",
        )
    }
}

fn validate_login(email: &str, password: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("Email is required.");
    }
    if password.trim().is_empty() {
        return Err("Password is required.");
    }
    Ok(())
}

#[tauri::command]
pub async fn auth_signup<R: Runtime>(
    _app: AppHandle<R>,
    state: State<'_, AppState<R>>,
    payload: SignupPayload,
) -> CommandResult<IpcResult<String>> {
    if let Err(message) = validate_signup(&payload) {
        return Ok(IpcResult::err(IpcErrorCode::Validation, message));
    }

    Ok(match state.api.signup(&payload).await {
        Ok(message) => IpcResult::ok(message),
        Err(err) => {
            warn!(error = %describe_for_log(&err), "signup failed");
            IpcResult::err(
                IpcErrorCode::Network,
                err.user_message("Signup failed. Please try again."),
            )
        }
    })
}

#[tauri::command]
pub async fn auth_login<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState<R>>,
    email: String,
    password: String,
) -> CommandResult<IpcResult<SessionState>> {
    if let Err(message) = validate_login(&email, &password) {
        return Ok(IpcResult::err(IpcErrorCode::Validation, message));
    }

    let response = match state.api.login(email.trim(), &password).await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %describe_for_log(&err), "login failed");
            return Ok(IpcResult::err(
                IpcErrorCode::Unauthorized,
                err.user_message("Login failed. Please check your credentials."),
            ));
        }
    };

    let persisted = state.set_session(&app, &response.token, &response.user).await;

    // Token change: re-fetch so the feed never shows stale anonymous data.
    let scope = state.current_view().await.view.scope;
    let _ = state.refresh_secrets(&app, scope).await;

    Ok(login_outcome(persisted, state.session_state().await))
}

#[tauri::command]
pub async fn auth_logout<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState<R>>,
) -> CommandResult<IpcResult<SessionState>> {
    state.clear_session(&app).await;
    let _ = state.refresh_secrets(&app, Scope::All).await;
    Ok(IpcResult::ok(state.session_state().await))
}

#[tauri::command]
pub async fn session_state<R: Runtime>(
    _app: AppHandle<R>,
    state: State<'_, AppState<R>>,
) -> CommandResult<IpcResult<SessionState>> {
    Ok(IpcResult::ok(state.session_state().await))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SignupPayload {
        SignupPayload {
            f_name: "Ada".to_string(),
            l_name: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
            password: "p".to_string(),
            phone_number: "555-0100".to_string(),
            address: "12 Analytical Way".to_string(),
        }
    }

    #[test]
    fn complete_signup_payload_passes() {
        assert!(validate_signup(&payload()).is_ok());
    }

    #[test]
    fn each_missing_signup_field_is_rejected() {
        let mut p = payload();
        p.f_name = "  ".to_string();
        assert_eq!(validate_signup(&p), Err("First name is required."));

        let mut p = payload();
        p.email = String::new();
        assert_eq!(validate_signup(&p), Err("Email is required."));

        let mut p = payload();
        p.password = "\t".to_string();
        assert_eq!(validate_signup(&p), Err("Password is required."));

        let mut p = payload();
        p.address = String::new();
        assert_eq!(validate_signup(&p), Err("Address is required."));
    }

    fn session() -> SessionState {
        SessionState {
            authenticated: true,
            keyring_available: false,
            profile: None,
        }
    }

    #[test]
    fn persisted_login_returns_session_state() {
        match login_outcome(true, session()) {
            IpcResult::Ok { value, .. } => assert!(value.authenticated),
            IpcResult::Err { .. } => panic!("persisted login must not error"),
        }
    }

    #[test]
    fn keyring_write_failure_surfaces_keyring_code() {
        match login_outcome(false, session()) {
            IpcResult::Err { error, .. } => assert_eq!(error.code, "keyring"),
            IpcResult::Ok { .. } => panic!("memory-only session must carry a keyring warning"),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login("a@x.com", "p").is_ok());
        assert!(validate_login("", "p").is_err());
        assert!(validate_login("a@x.com", "  ").is_err());
    }
}

use crate::api::SecretsApiClient;
use crate::commands;
use crate::settings::SettingsStore;
use crate::state::{AppState, SessionManager, KEYRING_USER_SESSION_TOKEN};
use crate::types::{Scope, SecretsViewState};
use std::sync::Arc;
use tauri::Manager;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("secretvault_lib=info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::default().build())
        .invoke_handler(tauri::generate_handler![
            commands::auth_signup,
            commands::auth_login,
            commands::auth_logout,
            commands::session_state,
            commands::secrets_refresh,
            commands::secrets_create,
            commands::secrets_delete,
            commands::secrets_view_detail,
            commands::secrets_close_detail,
            commands::secrets_get_view,
        ])
        .setup(|app| {
            let app_handle = app.handle().clone();

            let settings = SettingsStore::new(&app_handle)?;
            let api = SecretsApiClient::new(settings.api_base_url())?;

            let state = AppState {
                settings,
                session: SessionManager::new(KEYRING_USER_SESSION_TOKEN),
                api: Arc::new(api),
                view: Arc::new(Mutex::new(SecretsViewState::default())),
            };

            // Initial mount: populate the public feed without waiting for a
            // user action.
            {
                let state = state.clone();
                let handle = app_handle.clone();
                tauri::async_runtime::spawn(async move {
                    let _ = state.refresh_secrets(&handle, Scope::All).await;
                });
            }

            app.manage(state);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

use crate::state::AppState;
use crate::types::{IpcError, IpcResult, Scope, Secret, ViewSnapshot};
use tauri::{AppHandle, Runtime, State};

type CommandResult<T> = Result<T, IpcError>;

#[tauri::command]
pub async fn secrets_refresh<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState<R>>,
    scope: Scope,
) -> CommandResult<IpcResult<()>> {
    Ok(state.refresh_secrets(&app, scope).await)
}

#[tauri::command]
pub async fn secrets_create<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState<R>>,
    text: String,
) -> CommandResult<IpcResult<Secret>> {
    Ok(state.create_secret(&app, text).await)
}

#[tauri::command]
pub async fn secrets_delete<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState<R>>,
    id: String,
) -> CommandResult<IpcResult<String>> {
    Ok(state.delete_secret(&app, id).await)
}

#[tauri::command]
pub async fn secrets_view_detail<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState<R>>,
    id: String,
) -> CommandResult<IpcResult<Secret>> {
    Ok(state.view_detail(&app, id).await)
}

#[tauri::command]
pub async fn secrets_close_detail<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, AppState<R>>,
) -> CommandResult<IpcResult<()>> {
    state.close_detail(&app).await;
    Ok(IpcResult::ok(()))
}

#[tauri::command]
pub async fn secrets_get_view<R: Runtime>(
    _app: AppHandle<R>,
    state: State<'_, AppState<R>>,
) -> CommandResult<IpcResult<ViewSnapshot>> {
    Ok(IpcResult::ok(state.current_view().await))
}

use crate::types::UserProfile;
use serde_json::json;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tauri::Runtime;
use tauri_plugin_store::{JsonValue, Store, StoreBuilder};

const SETTINGS_STORE_FILE: &str = "secretvault-settings.json";

pub const KEY_API_BASE_URL: &str = "apiBaseUrl";
pub const KEY_USER_PROFILE: &str = "userProfile";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

fn defaults() -> HashMap<String, JsonValue> {
    HashMap::from([
        (KEY_API_BASE_URL.to_string(), json!(DEFAULT_API_BASE_URL)),
        (KEY_USER_PROFILE.to_string(), json!(null)),
    ])
}

pub struct SettingsStore<R: Runtime> {
    store: Arc<Store<R>>,
}

impl<R: Runtime> Clone for SettingsStore<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Runtime> SettingsStore<R> {
    pub fn new(app: &tauri::AppHandle<R>) -> tauri_plugin_store::Result<Self> {
        let store = StoreBuilder::new(app, SETTINGS_STORE_FILE)
            .defaults(defaults())
            .auto_save(Duration::from_millis(200))
            .build()?;
        Ok(Self { store })
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        let v = self.store.get(key)?;
        let s = v.as_str()?.trim();
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    }

    pub fn set(&self, key: &str, value: impl Into<JsonValue>) {
        self.store.set(key.to_string(), value.into());
    }

    pub fn remove(&self, key: &str) {
        let _ = self.store.delete(key.to_string());
    }

    pub fn api_base_url(&self) -> String {
        self.get_string(KEY_API_BASE_URL)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Cached profile from the last login, for display only. A corrupt or
    /// absent record reads as "no profile" rather than failing.
    pub fn user_profile(&self) -> Option<UserProfile> {
        let value = self.store.get(KEY_USER_PROFILE)?;
        serde_json::from_value(value).ok()
    }

    pub fn set_user_profile(&self, profile: &UserProfile) {
        if let Ok(value) = serde_json::to_value(profile) {
            self.set(KEY_USER_PROFILE, value);
        }
    }

    pub fn clear_user_profile(&self) {
        self.remove(KEY_USER_PROFILE);
    }
}

use std::sync::Arc;
use tokio::sync::Mutex;

const KEYRING_SERVICE: &str = "com.secretvault.desktop";
pub const KEYRING_USER_SESSION_TOKEN: &str = "session_token";

/// Single source of truth for the credential token. The keyring entry is the
/// durable copy; the in-process fallback only answers when the keyring
/// backend itself is unreachable, so an anonymous-capable client never blocks
/// on a storage failure.
#[derive(Clone)]
pub struct SessionManager {
    user: &'static str,
    fallback: Arc<Mutex<Option<String>>>,
}

impl SessionManager {
    pub fn new(user: &'static str) -> Self {
        Self {
            user,
            fallback: Arc::new(Mutex::new(None)),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(KEYRING_SERVICE, self.user)
    }

    pub fn is_available(&self) -> bool {
        let Ok(entry) = self.entry() else {
            return false;
        };

        match entry.get_password() {
            Ok(_) => true,
            Err(keyring::Error::NoEntry) => true,
            Err(keyring::Error::BadEncoding(_)) => true,
            Err(keyring::Error::Ambiguous(_)) => true,
            Err(keyring::Error::NoStorageAccess(_)) => false,
            Err(keyring::Error::PlatformFailure(_)) => false,
            Err(_) => false,
        }
    }

    /// Reads the token fresh from durable storage. `None` means anonymous
    /// viewer; every read failure short of a dead backend degrades to `None`
    /// as well, never to an error the UI would have to handle.
    pub async fn token(&self) -> Option<String> {
        let entry = match self.entry() {
            Ok(entry) => entry,
            Err(_) => return self.fallback.lock().await.clone(),
        };

        match entry.get_password() {
            Ok(token) => {
                let trimmed = token.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(keyring::Error::NoEntry) => {
                // Cleared by another context; drop the fallback too so this
                // process reverts to anonymous.
                let mut guard = self.fallback.lock().await;
                *guard = None;
                None
            }
            Err(keyring::Error::NoStorageAccess(_)) | Err(keyring::Error::PlatformFailure(_)) => {
                self.fallback.lock().await.clone()
            }
            Err(_) => None,
        }
    }

    /// Persists a freshly validated token. When the keyring write fails the
    /// session still lives in this process via the fallback; the caller
    /// surfaces a keyring warning.
    pub async fn store(&self, token: &str) -> Result<(), ()> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(());
        }

        {
            let mut guard = self.fallback.lock().await;
            *guard = Some(trimmed.to_string());
        }

        let entry = self.entry().map_err(|_| ())?;
        entry.set_password(trimmed).map_err(|_| ())?;
        Ok(())
    }

    pub async fn clear(&self) {
        if let Ok(entry) = self.entry() {
            let _ = entry.delete_credential();
        }
        let mut guard = self.fallback.lock().await;
        *guard = None;
    }
}

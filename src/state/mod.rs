mod app_state;
mod session;

pub use app_state::AppState;
pub use session::{SessionManager, KEYRING_USER_SESSION_TOKEN};

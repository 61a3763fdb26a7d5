mod auth;
mod secrets;

pub use auth::*;
pub use secrets::*;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod types;
pub mod views;

pub use api::{ApiClient, AuthApi, DatabaseApi};
pub use auth::{AuthHandle, AuthState};
pub use error::DeckError;
pub use session::SessionStore;

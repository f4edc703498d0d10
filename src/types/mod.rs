//! Wire types shared by the API client, the session store and the views.

pub mod database;
pub mod requests;
pub mod user;

pub use database::{DatabaseId, DatabaseRecord, DeleteOutcome};
pub use requests::{CreateDatabaseRequest, LoginRequest, SignupRequest};
pub use user::{User, UserId};

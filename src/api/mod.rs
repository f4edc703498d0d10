pub mod client;
pub mod fallback;

pub use client::{ApiClient, Endpoints};
pub use fallback::with_fallback;

use crate::error::DeckError;
use crate::types::{
    CreateDatabaseRequest, DatabaseId, DatabaseRecord, DeleteOutcome, LoginRequest, SignupRequest,
    User, UserId,
};
use async_trait::async_trait;

/// Account endpoints. Implementations never touch the session; adopting the
/// returned user is the auth context's job.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, req: &SignupRequest) -> Result<User, DeckError>;
    async fn login(&self, req: &LoginRequest) -> Result<User, DeckError>;
}

/// Database instance endpoints.
#[async_trait]
pub trait DatabaseApi: Send + Sync {
    async fn create_database(&self, req: &CreateDatabaseRequest)
    -> Result<DatabaseRecord, DeckError>;
    async fn user_databases(&self, user_id: UserId) -> Result<Vec<DatabaseRecord>, DeckError>;
    async fn delete_database(&self, id: DatabaseId) -> Result<DeleteOutcome, DeckError>;
}

//! Process-wide auth context.
//!
//! One actor owns the current user and the [`SessionStore`]. Views hold a
//! cloneable [`AuthHandle`]; every read and every transition goes through the
//! actor's mailbox, so a reader sees the state either before or after a
//! login/logout, never in between.

use crate::error::DeckError;
use crate::session::SessionStore;
use crate::types::User;

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Arc<User>),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(user) => Some(user.as_ref()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Messages handled by the auth actor.
#[derive(Debug)]
pub enum AuthMessage {
    /// Snapshot of the whole state.
    GetState(RpcReplyPort<AuthState>),
    /// Persist and adopt `user`. Replies whether the transition happened.
    Login(User, RpcReplyPort<bool>),
    /// Clear the session. Replies whether the transition happened.
    Logout(RpcReplyPort<bool>),
}

/// Handle for interacting with the auth actor.
#[derive(Clone)]
pub struct AuthHandle {
    actor: ActorRef<AuthMessage>,
}

impl AuthHandle {
    pub async fn state(&self) -> Result<AuthState, DeckError> {
        ractor::call!(self.actor, AuthMessage::GetState)
            .map_err(|e| DeckError::RactorError(format!("GetState RPC failed: {e}")))
    }

    pub async fn current_user(&self) -> Result<Option<User>, DeckError> {
        Ok(self.state().await?.user().cloned())
    }

    pub async fn is_authenticated(&self) -> Result<bool, DeckError> {
        Ok(self.state().await?.is_authenticated())
    }

    /// Returns `false` when the session could not be persisted; the state is
    /// then left unchanged.
    pub async fn login(&self, user: User) -> Result<bool, DeckError> {
        ractor::call!(self.actor, AuthMessage::Login, user)
            .map_err(|e| DeckError::RactorError(format!("Login RPC failed: {e}")))
    }

    /// Returns `false` when the stored session could not be removed; the
    /// state is then left unchanged.
    pub async fn logout(&self) -> Result<bool, DeckError> {
        ractor::call!(self.actor, AuthMessage::Logout)
            .map_err(|e| DeckError::RactorError(format!("Logout RPC failed: {e}")))
    }

    /// The current user, or `NotAuthenticated`.
    pub async fn require_user(&self) -> Result<User, DeckError> {
        self.current_user()
            .await?
            .ok_or(DeckError::NotAuthenticated)
    }

    pub fn shutdown(&self) {
        self.actor.stop(None);
    }
}

struct AuthActorState {
    store: SessionStore,
    current: AuthState,
}

struct AuthActor;

#[ractor::async_trait]
impl Actor for AuthActor {
    type Msg = AuthMessage;
    type State = AuthActorState;
    type Arguments = SessionStore;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        store: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let current = match store.current_user().await {
            Some(user) => {
                info!(user_id = user.id, username = %user.username, "restored session");
                AuthState::Authenticated(Arc::new(user))
            }
            None => AuthState::Anonymous,
        };
        Ok(AuthActorState { store, current })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            AuthMessage::GetState(rp) => {
                let _ = rp.send(state.current.clone());
            }
            AuthMessage::Login(user, rp) => {
                let stored = state.store.login(&user).await;
                if stored {
                    info!(user_id = user.id, username = %user.username, "logged in");
                    state.current = AuthState::Authenticated(Arc::new(user));
                } else {
                    warn!(user_id = user.id, "login not persisted; staying in current state");
                }
                let _ = rp.send(stored);
            }
            AuthMessage::Logout(rp) => {
                let cleared = state.store.logout().await;
                if !cleared {
                    warn!("session not removed; staying in current state");
                } else if let AuthState::Authenticated(user) = &state.current {
                    info!(user_id = user.id, "logged out");
                    state.current = AuthState::Anonymous;
                } else {
                    debug!("logout while anonymous");
                }
                let _ = rp.send(cleared);
            }
        }
        Ok(())
    }
}

/// Spawn the auth actor; its initial state is read from `store` once.
pub async fn spawn(store: SessionStore) -> Result<AuthHandle, DeckError> {
    let (actor, _jh) = Actor::spawn(None, AuthActor, store)
        .await
        .map_err(|e| DeckError::RactorError(format!("failed to spawn AuthActor: {e}")))?;
    Ok(AuthHandle { actor })
}

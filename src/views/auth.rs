//! Signup/login page.

use crate::api::AuthApi;
use crate::auth::AuthHandle;
use crate::error::DeckError;
use crate::types::User;
use crate::views::forms::{LoginForm, SignupForm};

use std::sync::Arc;
use tracing::{info, warn};

pub const CONNECTION_ERROR: &str = "Connection error. Please check your network.";
pub const SESSION_NOT_SAVED: &str = "Signed in, but the session could not be saved.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Signup,
    Login,
}

pub struct AuthPage {
    api: Arc<dyn AuthApi>,
    auth: AuthHandle,
    mode: AuthMode,
    loading: bool,
    error: Option<String>,
}

impl AuthPage {
    pub fn new(api: Arc<dyn AuthApi>, auth: AuthHandle) -> Self {
        Self {
            api,
            auth,
            mode: AuthMode::Signup,
            loading: false,
            error: None,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            AuthMode::Signup => AuthMode::Login,
            AuthMode::Login => AuthMode::Signup,
        };
        self.error = None;
    }

    /// Create an account and sign it in. `None` means the error banner was set.
    pub async fn submit_signup(&mut self, form: SignupForm) -> Option<User> {
        self.error = None;
        let req = match form.into_request() {
            Ok(req) => req,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };
        self.loading = true;
        let result = self.api.signup(&req).await;
        let user = self.adopt(result).await;
        self.loading = false;
        user
    }

    pub async fn submit_login(&mut self, form: LoginForm) -> Option<User> {
        self.error = None;
        let req = match form.into_request() {
            Ok(req) => req,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };
        self.loading = true;
        let result = self.api.login(&req).await;
        let user = self.adopt(result).await;
        self.loading = false;
        user
    }

    async fn adopt(&mut self, result: Result<User, DeckError>) -> Option<User> {
        let user = match result {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "authentication request failed");
                self.error = Some(banner_message(&e));
                return None;
            }
        };
        match self.auth.login(user.clone()).await {
            Ok(true) => {
                info!(user_id = user.id, "authenticated");
                Some(user)
            }
            Ok(false) => {
                self.error = Some(SESSION_NOT_SAVED.to_string());
                None
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

/// Text for the error banner. Transport failures get a fixed hint; anything
/// else shows its own message.
pub fn banner_message(e: &DeckError) -> String {
    if e.is_transport() {
        CONNECTION_ERROR.to_string()
    } else {
        e.to_string()
    }
}

//! Top-level page switching.

use crate::auth::AuthHandle;
use crate::error::DeckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    Auth,
    Dashboard,
}

pub struct App {
    auth: AuthHandle,
    page: Page,
}

impl App {
    pub fn new(auth: AuthHandle) -> Self {
        Self {
            auth,
            page: Page::Landing,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn auth(&self) -> &AuthHandle {
        &self.auth
    }

    /// Landing call-to-action: straight to the dashboard when a session
    /// exists.
    pub async fn get_started(&mut self) -> Result<Page, DeckError> {
        self.page = if self.auth.is_authenticated().await? {
            Page::Dashboard
        } else {
            Page::Auth
        };
        Ok(self.page)
    }

    pub fn auth_succeeded(&mut self) {
        self.page = Page::Dashboard;
    }

    /// Back to the landing page once the session is gone. Returns `false`
    /// and stays put when it could not be removed.
    pub async fn logout(&mut self) -> Result<bool, DeckError> {
        let cleared = self.auth.logout().await?;
        if cleared {
            self.page = Page::Landing;
        }
        Ok(cleared)
    }
}

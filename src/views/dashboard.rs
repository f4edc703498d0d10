//! Dashboard state: the database list, the create/credentials flow and the
//! detail drawer.

use crate::api::DatabaseApi;
use crate::error::DeckError;
use crate::types::{DatabaseId, DatabaseRecord, User};
use crate::views::forms::CreateDatabaseForm;

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mutually exclusive main-panel modes.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardMode {
    Listing,
    Creating,
    /// Freshly created instance whose credentials are on screen.
    ShowingCredentials(DatabaseRecord),
}

pub struct Dashboard {
    api: Arc<dyn DatabaseApi>,
    user: User,
    databases: Vec<DatabaseRecord>,
    mode: DashboardMode,
    /// Id shown in the detail drawer, if open. Independent of `mode`.
    drawer: Option<DatabaseId>,
    loading: bool,
    provisioning: bool,
    /// Error banner; dismissible.
    error: Option<String>,
    /// Validation message inside the create panel.
    form_error: Option<String>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DatabaseApi>, user: User) -> Self {
        Self {
            api,
            user,
            databases: Vec::new(),
            mode: DashboardMode::Listing,
            drawer: None,
            loading: true,
            provisioning: false,
            error: None,
            form_error: None,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn databases(&self) -> &[DatabaseRecord] {
        &self.databases
    }

    pub fn mode(&self) -> &DashboardMode {
        &self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_provisioning(&self) -> bool {
        self.provisioning
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Record shown in the detail drawer, if open.
    pub fn drawer(&self) -> Option<&DatabaseRecord> {
        let id = self.drawer?;
        self.databases.iter().find(|db| db.id == id)
    }

    /// Reload the list from the API.
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.api.user_databases(self.user.id).await {
            Ok(databases) => {
                debug!(user_id = self.user.id, count = databases.len(), "databases loaded");
                self.databases = databases;
                if let Some(id) = self.drawer
                    && !self.databases.iter().any(|db| db.id == id)
                {
                    self.drawer = None;
                }
                self.error = None;
            }
            Err(e) => self.fail("fetch databases", e),
        }
        self.loading = false;
    }

    pub fn begin_create(&mut self) {
        if self.mode == DashboardMode::Listing {
            self.form_error = None;
            self.mode = DashboardMode::Creating;
        }
    }

    pub fn cancel_create(&mut self) {
        if self.mode == DashboardMode::Creating {
            self.mode = DashboardMode::Listing;
            self.provisioning = false;
            self.form_error = None;
        }
    }

    /// Validate locally, then issue one create request. Returns the new
    /// record on success; the dashboard then shows its credentials.
    pub async fn submit_create(&mut self, form: CreateDatabaseForm) -> Option<DatabaseRecord> {
        if self.mode != DashboardMode::Creating || self.provisioning {
            return None;
        }
        let req = match form.into_request(self.user.id) {
            Ok(req) => req,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return None;
            }
        };
        self.form_error = None;
        self.provisioning = true;
        let created = match self.api.create_database(&req).await {
            Ok(record) => {
                info!(id = record.id, db_name = %record.db_name, "database created");
                self.databases.push(record.clone());
                self.mode = DashboardMode::ShowingCredentials(record.clone());
                self.error = None;
                Some(record)
            }
            Err(e) => {
                self.fail("create database", e);
                None
            }
        };
        self.provisioning = false;
        created
    }

    pub fn close_credentials(&mut self) {
        if matches!(self.mode, DashboardMode::ShowingCredentials(_)) {
            self.mode = DashboardMode::Listing;
        }
    }

    /// Open the drawer on a listed record. Ignored outside `Listing` or for
    /// unknown ids.
    pub fn select(&mut self, id: DatabaseId) -> bool {
        if self.mode != DashboardMode::Listing || !self.databases.iter().any(|db| db.id == id) {
            return false;
        }
        self.drawer = Some(id);
        true
    }

    pub fn close_drawer(&mut self) {
        self.drawer = None;
    }

    /// Delete via the API; on success drop the matching entry (if listed) and
    /// close the drawer.
    pub async fn delete(&mut self, id: DatabaseId) -> bool {
        match self.api.delete_database(id).await {
            Ok(outcome) => {
                info!(id, message = ?outcome.message, "database deleted");
                self.databases.retain(|db| db.id != id);
                self.drawer = None;
                true
            }
            Err(e) => {
                self.fail("delete database", e);
                false
            }
        }
    }

    fn fail(&mut self, action: &str, e: DeckError) {
        warn!(action, error = %e, "dashboard request failed");
        self.error = Some(e.to_string());
    }
}

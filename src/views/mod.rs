//! View-layer state. Views call into the auth context and the API traits,
//! never the other way round.

pub mod app;
pub mod auth;
pub mod dashboard;
pub mod forms;

pub use app::{App, Page};
pub use auth::{AuthMode, AuthPage};
pub use dashboard::{Dashboard, DashboardMode};
pub use forms::{CreateDatabaseForm, LoginForm, SignupForm, ValidationError};

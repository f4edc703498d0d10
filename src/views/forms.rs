//! Local form validation. Nothing here touches the network.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error as ThisError;

use crate::types::{CreateDatabaseRequest, LoginRequest, SignupRequest, UserId};

pub const DATABASE_TYPES: &[&str] = &["POSTGRES"];
pub const DATABASE_VERSIONS: &[&str] = &["16"];

const DB_NAME_MIN: usize = 3;
const DB_NAME_MAX: usize = 63;
const USERNAME_MIN: usize = 3;
const PASSWORD_MIN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static DB_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid db name regex"));

/// A rejected form. The display text is what the form shows.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("Database name is required")]
    DatabaseNameRequired,
    #[error("Database name must be at least 3 characters")]
    DatabaseNameTooShort,
    #[error("Database name must be at most 63 characters")]
    DatabaseNameTooLong,
    #[error("Database name can only contain letters, numbers, hyphens, and underscores")]
    DatabaseNameCharacters,
    #[error("Unsupported database type: {0}")]
    UnsupportedType(String),
    #[error("Unsupported database version: {0}")]
    UnsupportedVersion(String),
    #[error("Username is required")]
    UsernameRequired,
    #[error("Username must be at least 3 characters")]
    UsernameTooShort,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDatabaseForm {
    pub database_name: String,
    pub db_type: String,
    pub version: String,
    pub description: String,
}

impl Default for CreateDatabaseForm {
    fn default() -> Self {
        Self {
            database_name: String::new(),
            db_type: DATABASE_TYPES[0].to_string(),
            version: DATABASE_VERSIONS[0].to_string(),
            description: String::new(),
        }
    }
}

impl CreateDatabaseForm {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            database_name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = &self.database_name;
        if name.trim().is_empty() {
            return Err(ValidationError::DatabaseNameRequired);
        }
        if name.chars().count() < DB_NAME_MIN {
            return Err(ValidationError::DatabaseNameTooShort);
        }
        if name.chars().count() > DB_NAME_MAX {
            return Err(ValidationError::DatabaseNameTooLong);
        }
        if !DB_NAME_RE.is_match(name) {
            return Err(ValidationError::DatabaseNameCharacters);
        }
        if !DATABASE_TYPES.contains(&self.db_type.as_str()) {
            return Err(ValidationError::UnsupportedType(self.db_type.clone()));
        }
        if !DATABASE_VERSIONS.contains(&self.version.as_str()) {
            return Err(ValidationError::UnsupportedVersion(self.version.clone()));
        }
        Ok(())
    }

    /// Validate and build the wire request for `user_id`.
    pub fn into_request(self, user_id: UserId) -> Result<CreateDatabaseRequest, ValidationError> {
        self.validate()?;
        Ok(CreateDatabaseRequest {
            user_id,
            db_name: self.database_name,
            db_type: self.db_type,
            db_version: self.version,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::UsernameRequired);
        }
        if self.username.chars().count() < USERNAME_MIN {
            return Err(ValidationError::UsernameTooShort);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    pub fn into_request(self) -> Result<SignupRequest, ValidationError> {
        self.validate()?;
        Ok(SignupRequest::new(self.username, self.email, self.password))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        Ok(())
    }

    pub fn into_request(self) -> Result<LoginRequest, ValidationError> {
        self.validate()?;
        Ok(LoginRequest {
            email: self.email,
            password: self.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_rules() {
        assert_eq!(
            CreateDatabaseForm::named("   ").validate(),
            Err(ValidationError::DatabaseNameRequired)
        );
        assert_eq!(
            CreateDatabaseForm::named("ab").validate(),
            Err(ValidationError::DatabaseNameTooShort)
        );
        assert_eq!(
            CreateDatabaseForm::named("my db").validate(),
            Err(ValidationError::DatabaseNameCharacters)
        );
        assert_eq!(
            CreateDatabaseForm::named("x".repeat(64)).validate(),
            Err(ValidationError::DatabaseNameTooLong)
        );
        assert!(CreateDatabaseForm::named("abc").validate().is_ok());
        assert!(CreateDatabaseForm::named("my_app-db2").validate().is_ok());
        assert!(CreateDatabaseForm::named("x".repeat(63)).validate().is_ok());
    }

    #[test]
    fn database_type_and_version_are_fixed() {
        let mut form = CreateDatabaseForm::named("orders");
        form.db_type = "MYSQL".into();
        assert_eq!(
            form.validate(),
            Err(ValidationError::UnsupportedType("MYSQL".into()))
        );
        let mut form = CreateDatabaseForm::named("orders");
        form.version = "9".into();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Unsupported database version: 9"
        );
    }

    #[test]
    fn into_request_carries_user_id() {
        let mut form = CreateDatabaseForm::named("orders");
        form.description = "shop orders".into();
        let req = form.into_request(42).unwrap();
        assert_eq!(req.user_id, 42);
        assert_eq!(req.db_type, "POSTGRES");
        assert_eq!(req.db_version, "16");
        assert_eq!(req.description, "shop orders");
    }

    #[test]
    fn signup_rules_in_order() {
        let mut form = SignupForm {
            username: "al".into(),
            email: "al@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError::UsernameTooShort));
        form.username = "alan".into();
        form.email = "alan@localhost".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidEmail));
        form.email = "alan@example.com".into();
        form.password = "12345".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordTooShort));
        form.password = "123456".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
        form.confirm_password = "123456".into();
        let req = form.into_request().unwrap();
        assert_eq!(req.username, "alan");
    }

    #[test]
    fn login_rules() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "x".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError::InvalidEmail));
        let form = LoginForm {
            email: "a@b.co".into(),
            password: String::new(),
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Password is required"
        );
    }
}

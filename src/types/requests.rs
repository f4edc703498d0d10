use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::user::UserId;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// ISO-8601 with millisecond precision, e.g. `2025-02-01T12:30:00.000Z`.
    pub creation_date: String,
}

impl SignupRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            creation_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    pub user_id: UserId,
    pub db_name: String,
    pub db_type: String,
    pub db_version: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_are_camel_case() {
        let req = CreateDatabaseRequest {
            user_id: 4,
            db_name: "orders".into(),
            db_type: "POSTGRES".into(),
            db_version: "16".into(),
            description: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"userId":4,"dbName":"orders","dbType":"POSTGRES","dbVersion":"16","description":""})
        );

        let signup = SignupRequest::new("ada", "ada@example.com", "hunter22");
        let v = serde_json::to_value(&signup).unwrap();
        let date = v["creationDate"].as_str().unwrap();
        assert!(date.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok());
    }
}

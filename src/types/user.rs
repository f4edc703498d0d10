use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Authenticated account as returned by signup/login.
///
/// No password field: anything the server echoes back is dropped on
/// deserialization and never reaches the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_echoed_password_is_dropped() {
        let raw = r#"{"id":7,"username":"ada","email":"ada@example.com",
                      "password":"hunter22","creationDate":"2024-05-01T10:00:00Z"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, 7);
        let back = serde_json::to_string(&user).unwrap();
        assert!(!back.contains("hunter22"));
        assert!(!back.contains("password"));
    }
}

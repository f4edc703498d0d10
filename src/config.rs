use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DeckError;

/// Runtime configuration.
///
/// Defaults are layered under `DBDECK_*` environment variables, e.g.
/// `DBDECK_API_URL=https://deck.example.com/api/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Primary API base. Requests go here first.
    pub api_url: Url,
    /// Absolute backend URL tried once when the primary cannot be reached.
    pub fallback_url: Option<Url>,
    /// SQLite database holding the local session record.
    pub database_url: String,
    pub loglevel: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub proxy: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse("http://localhost:5173/api/").expect("static url"),
            fallback_url: Some(Url::parse("http://localhost:8080/api/").expect("static url")),
            database_url: "sqlite://dbdeck-session.sqlite".to_string(),
            loglevel: "info".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            proxy: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, DeckError> {
        Self::figment().extract().map_err(DeckError::from)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("DBDECK_"))
    }

    /// Host used in connection strings when a record does not carry one.
    pub fn backend_host(&self) -> String {
        self.fallback_url
            .as_ref()
            .unwrap_or(&self.api_url)
            .host_str()
            .unwrap_or("localhost")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_extract_cleanly() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .extract()
            .expect("defaults should extract");
        assert_eq!(cfg.api_url.as_str(), "http://localhost:5173/api/");
        assert_eq!(cfg.loglevel, "info");
        assert_eq!(cfg.backend_host(), "localhost");
    }

    #[test]
    fn serialized_overrides_win() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::default("fallback_url", "http://10.0.0.7:8080/api/"))
            .merge(Serialized::default("request_timeout_secs", 3))
            .extract()
            .expect("override should extract");
        assert_eq!(cfg.request_timeout_secs, 3);
        assert_eq!(cfg.backend_host(), "10.0.0.7");
    }
}

use super::fallback::with_fallback;
use super::{AuthApi, DatabaseApi};
use crate::config::Config;
use crate::error::{ApiErrorBody, DeckError};
use crate::types::{
    CreateDatabaseRequest, DatabaseId, DatabaseRecord, DeleteOutcome, LoginRequest, SignupRequest,
    User, UserId,
};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Primary and optional fallback API bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    primary: Url,
    fallback: Option<Url>,
}

impl Endpoints {
    pub fn new(primary: Url, fallback: Option<Url>) -> Self {
        Self {
            primary: with_trailing_slash(primary),
            fallback: fallback.map(with_trailing_slash),
        }
    }

    /// Resolve an API path such as `/db/user/4` against both bases.
    pub fn resolve(&self, path: &str) -> Result<(Url, Option<Url>), DeckError> {
        let path = path.trim_start_matches('/');
        let primary = self.primary.join(path)?;
        let fallback = self.fallback.as_ref().map(|f| f.join(path)).transpose()?;
        Ok((primary, fallback))
    }
}

// `Url::join` drops the last segment of a base without a trailing slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Thin JSON client for the provisioning API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Build the HTTP client from configuration.
    pub fn from_config(cfg: &Config) -> Result<Self, DeckError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("dbdeck/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.request_timeout_secs));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let http = builder.build()?;
        Ok(Self::new(
            http,
            Endpoints::new(cfg.api_url.clone(), cfg.fallback_url.clone()),
        ))
    }

    /// Send one request with the primary/fallback strategy. The body is
    /// shared byte-for-byte between both attempts.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response, DeckError> {
        let (primary, fallback) = self.endpoints.resolve(path)?;
        let resp = with_fallback(primary, fallback, |url| {
            let mut req = self
                .http
                .request(method.clone(), url)
                .header(CONTENT_TYPE, "application/json");
            if let Some(bytes) = body.as_ref() {
                req = req.body(bytes.clone());
            }
            req.send()
        })
        .await?;
        debug!(%method, path, status = %resp.status(), "api response");
        Ok(resp)
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response, DeckError> {
        let bytes = serde_json::to_vec(body)?;
        self.send(method, path, Some(bytes)).await
    }

    /// Pass success responses through; turn anything else into `Api` with
    /// the server's `message`, or `generic` when there is none.
    async fn check(resp: Response, generic: &str) -> Result<Response, DeckError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.bytes().await.unwrap_or_default();
        let message = ApiErrorBody::message_from(&body).unwrap_or_else(|| generic.to_string());
        warn!(%status, %message, "api request rejected");
        Err(DeckError::Api { status, message })
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, DeckError> {
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn signup(&self, req: &SignupRequest) -> Result<User, DeckError> {
        let resp = self.send_json(Method::POST, "users/create", req).await?;
        let resp = Self::check(resp, "Signup failed").await?;
        Self::read_json(resp).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<User, DeckError> {
        let resp = self.send_json(Method::POST, "users/login", req).await?;
        let generic = if resp.status() == StatusCode::UNAUTHORIZED {
            "Invalid email or password"
        } else {
            "Login failed"
        };
        let resp = Self::check(resp, generic).await?;
        Self::read_json(resp).await
    }
}

#[async_trait]
impl DatabaseApi for ApiClient {
    async fn create_database(
        &self,
        req: &CreateDatabaseRequest,
    ) -> Result<DatabaseRecord, DeckError> {
        let resp = self.send_json(Method::POST, "db/create", req).await?;
        let resp = Self::check(resp, "Failed to create database").await?;
        Self::read_json(resp).await
    }

    async fn user_databases(&self, user_id: UserId) -> Result<Vec<DatabaseRecord>, DeckError> {
        let resp = self
            .send(Method::GET, &format!("db/user/{user_id}"), None)
            .await?;
        let resp = Self::check(resp, "Failed to fetch databases").await?;
        Self::read_json(resp).await
    }

    /// JSON bodies are read for `success`/`message`; plain text becomes the
    /// message; an empty body is success.
    async fn delete_database(&self, id: DatabaseId) -> Result<DeleteOutcome, DeckError> {
        let resp = self.send(Method::DELETE, &format!("db/{id}"), None).await?;
        let resp = Self::check(resp, "Failed to delete database").await?;
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(DeleteOutcome::ok(None));
        }
        if is_json && let Ok(value) = serde_json::from_str::<Value>(&text) {
            return Ok(DeleteOutcome::from_json(&value));
        }
        Ok(DeleteOutcome::ok(Some(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_keeps_base_path() {
        let eps = Endpoints::new(
            Url::parse("http://localhost:5173/api").unwrap(),
            Some(Url::parse("http://10.0.0.7:8080/api/").unwrap()),
        );
        let (primary, fallback) = eps.resolve("/users/login").unwrap();
        assert_eq!(primary.as_str(), "http://localhost:5173/api/users/login");
        assert_eq!(
            fallback.map(|u| u.to_string()).as_deref(),
            Some("http://10.0.0.7:8080/api/users/login")
        );

        let eps = Endpoints::new(Url::parse("http://h/api/").unwrap(), None);
        let (primary, fallback) = eps.resolve("db/user/4").unwrap();
        assert_eq!(primary.as_str(), "http://h/api/db/user/4");
        assert!(fallback.is_none());
    }
}

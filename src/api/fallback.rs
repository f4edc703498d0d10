use std::fmt::Display;
use std::future::Future;
use tracing::warn;
use url::Url;

/// Two-step send: try `primary`; if that attempt errors, try `fallback` once.
///
/// `attempt` must only return `Err` for transport-level failures. HTTP error
/// statuses belong in `Ok` so they are never retried. The fallback's own
/// error is returned unchanged, and with no fallback configured the primary
/// error is.
pub async fn with_fallback<T, E, F, Fut>(
    primary: Url,
    fallback: Option<Url>,
    mut attempt: F,
) -> Result<T, E>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let primary_err = match attempt(primary.clone()).await {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };
    let Some(fallback) = fallback else {
        return Err(primary_err);
    };
    warn!(
        primary = %primary,
        fallback = %fallback,
        error = %primary_err,
        "primary endpoint unreachable, using fallback"
    );
    attempt(fallback).await
}

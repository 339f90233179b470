//! Image reference resolution.
//!
//! Products carry opaque file identifiers rather than URLs. A resolver turns
//! one into something a page can render and never fails: when the lookup does
//! not succeed the configured fallback path is returned instead.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;

use storefront_kernel::settings::MediaSettings;

use crate::error::{ClientError, Result};

/// Turns an image reference into a displayable URL.
#[async_trait]
pub trait ImageResolver: Send + Sync {
    /// Always returns a renderable URL; failures map to a fallback.
    async fn resolve(&self, reference: &str) -> String;
}

/// Resolve every reference concurrently, preserving input order.
///
/// One failed lookup never affects the others.
pub async fn resolve_all<R, I, S>(resolver: &R, references: I) -> Vec<String>
where
    R: ImageResolver + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str> + Send,
{
    let lookups = references
        .into_iter()
        .map(move |reference| async move { resolver.resolve(reference.as_ref()).await });
    join_all(lookups).await
}

/// Resolves file identifiers through the Telegram Bot API `getFile` method.
#[derive(Clone)]
pub struct TelegramResolver {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    fallback: String,
}

#[derive(Debug, Deserialize)]
struct GetFileResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<FileLocation>,
}

#[derive(Debug, Deserialize)]
struct FileLocation {
    #[serde(default)]
    file_path: Option<String>,
}

impl TelegramResolver {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        fallback: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Builder)?;

        let api_base: String = api_base.into();
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            fallback: fallback.into(),
        })
    }

    pub fn from_settings(settings: &MediaSettings) -> Result<Self> {
        if settings.bot_token.is_empty() {
            tracing::warn!("media bot token is empty; image lookups will fall back");
        }
        Self::new(
            settings.api_base.clone(),
            settings.bot_token.clone(),
            settings.fallback_image.clone(),
            settings.timeout_ms.map(Duration::from_millis),
        )
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_base,
            self.bot_token,
            file_path.trim_start_matches('/')
        )
    }

    async fn lookup(&self, file_id: &str) -> Result<String> {
        if file_id.is_empty() {
            return Err(ClientError::Lookup("empty file identifier".to_string()));
        }

        let url = format!("{}/bot{}/getFile", self.api_base, self.bot_token);
        // Transport errors would otherwise echo the token-bearing url.
        let response = self
            .http
            .get(&url)
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Lookup(format!(
                "getFile responded with status {}",
                status.as_u16()
            )));
        }

        let body: GetFileResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.without_url()))?;

        if !body.ok {
            return Err(ClientError::Lookup(
                body.description
                    .unwrap_or_else(|| "getFile rejected the identifier".to_string()),
            ));
        }

        let file_path = body
            .result
            .and_then(|location| location.file_path)
            .filter(|path| !path.is_empty())
            .ok_or_else(|| ClientError::Lookup("response carried no file_path".to_string()))?;

        Ok(self.file_url(&file_path))
    }
}

#[async_trait]
impl ImageResolver for TelegramResolver {
    async fn resolve(&self, reference: &str) -> String {
        match self.lookup(reference).await {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(
                    file_id = %reference,
                    error = %err,
                    "image lookup failed, using fallback"
                );
                self.fallback.clone()
            }
        }
    }
}

/// Serves absolute references untouched and everything else from the local
/// static directory. Performs no network calls.
#[derive(Debug, Clone, Default)]
pub struct StaticPathResolver;

impl StaticPathResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn to_url(reference: &str) -> String {
        if reference.starts_with("http") {
            reference.to_string()
        } else {
            format!("/{}", reference.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl ImageResolver for StaticPathResolver {
    async fn resolve(&self, reference: &str) -> String {
        Self::to_url(reference)
    }
}

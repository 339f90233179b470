//! Per-page fetch lifecycle: `Idle -> Loading -> {Ready, Failed}`.

use std::fmt::Display;
use std::future::Future;

use tokio_util::sync::CancellationToken;

/// State of one page's data fetch. `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    /// Holds the user-facing message, never the underlying error.
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    /// `Idle -> Loading`. Returns whether the transition happened.
    pub fn begin(&mut self) -> bool {
        match self {
            ViewState::Idle => {
                *self = ViewState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Commit a fetch result. Only a `Loading` view accepts one; errors are
    /// logged and replaced by `message`.
    pub fn finish<E: Display>(&mut self, result: Result<T, E>, message: &str) -> bool {
        if !matches!(self, ViewState::Loading) {
            return false;
        }
        *self = match result {
            Ok(value) => ViewState::Ready(value),
            Err(err) => {
                tracing::error!(error = %err, "{}", message);
                ViewState::Failed(message.to_string())
            }
        };
        true
    }

    /// Fail without fetching, e.g. when the page has nothing to fetch.
    pub fn fail(&mut self, message: &str) -> bool {
        if self.is_terminal() {
            return false;
        }
        *self = ViewState::Failed(message.to_string());
        true
    }

    /// Run `fetch` for this view, committing its result only while `cancel`
    /// is still live. A cancelled load leaves the view in `Loading`.
    pub async fn load_scoped<F, E>(
        &mut self,
        cancel: &CancellationToken,
        fetch: F,
        failure_message: &str,
    ) -> bool
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        if !self.begin() {
            return false;
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("view load cancelled before completion");
                return false;
            }
            result = fetch => result,
        };

        if cancel.is_cancelled() {
            tracing::debug!("view load cancelled, dropping result");
            return false;
        }

        self.finish(result, failure_message)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ViewState::Ready(_) | ViewState::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

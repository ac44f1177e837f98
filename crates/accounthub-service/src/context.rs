//! Request context carrying the cancellation token and deadline.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use accounthub_core::config::RequestConfig;
use accounthub_core::error::AppError;
use accounthub_core::result::AppResult;

/// Context for one request.
///
/// Passed into every service method. Each store call a service makes is
/// raced against the cancellation token and the deadline; whichever fires
/// first turns the call into a `Cancelled` error and drops the pending
/// future.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlates log lines of one request.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context with no deadline.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7(),
            request_time: Utc::now(),
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Creates a context using the configured request timeout.
    pub fn from_config(config: &RequestConfig) -> Self {
        let ctx = Self::new();
        if config.timeout_seconds == 0 {
            ctx
        } else {
            ctx.with_timeout(Duration::from_secs(config.timeout_seconds))
        }
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Uses a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The token that cancels this request.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel the request.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `fut` unless the request is cancelled or its deadline passes first.
    pub async fn run<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(AppError::cancelled(format!(
                "Request {} was cancelled",
                self.request_id
            )));
        }

        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::cancelled(format!(
                "Request {} was cancelled",
                self.request_id
            ))),
            _ = deadline => Err(AppError::cancelled(format!(
                "Request {} exceeded its deadline",
                self.request_id
            ))),
            result = fut => result,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

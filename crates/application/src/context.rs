use hexcamp_domain::DomainError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation scope of one inbound request.
///
/// Everything a request does after dispatch, the recursive lookup
/// included, runs inside this scope.
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl RequestContext {
    pub fn new(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Scope tied to a parent token, typically the server's shutdown token.
    pub fn with_parent(timeout: Duration, parent: &CancellationToken) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            cancel: parent.child_token(),
        }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// The error a finished scope reports, or `None` while it is live.
    pub fn done_error(&self) -> Option<DomainError> {
        if self.is_cancelled() {
            Some(DomainError::Cancelled)
        } else if self.is_expired() {
            Some(DomainError::QueryTimeout)
        } else {
            None
        }
    }

    /// Drives `future` until it completes, the deadline passes or the scope
    /// is cancelled, whichever comes first.
    pub async fn run<F, T>(&self, future: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DomainError::Cancelled),
            result = tokio::time::timeout_at(self.deadline, future) => match result {
                Ok(inner) => inner,
                Err(_) => Err(DomainError::QueryTimeout),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_returns_inner_result() {
        let ctx = RequestContext::new(Duration::from_secs(1));
        let result = ctx.run(async { Ok::<_, DomainError>(7) }).await;
        assert_eq!(result, Ok(7));
        assert!(ctx.done_error().is_none());
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let ctx = RequestContext::new(Duration::from_millis(20));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, DomainError>(())
            })
            .await;
        assert_eq!(result, Err(DomainError::QueryTimeout));
        assert_eq!(ctx.done_error(), Some(DomainError::QueryTimeout));
    }

    #[tokio::test]
    async fn test_cancelled_parent_cancels_request() {
        let parent = CancellationToken::new();
        let ctx = RequestContext::with_parent(Duration::from_secs(5), &parent);
        parent.cancel();

        assert!(ctx.is_cancelled());
        assert_eq!(ctx.done_error(), Some(DomainError::Cancelled));
        let result = ctx.run(async { Ok::<_, DomainError>(()) }).await;
        assert_eq!(result, Err(DomainError::Cancelled));
    }
}

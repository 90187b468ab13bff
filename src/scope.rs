//! View Lifetimes
//!
//! A [`ViewScope`] is owned by a view for as long as it is mounted.
//! Fetches started by the view run through [`ViewScope::run`]; once the scope
//! is disposed (explicitly or by dropping it) any outstanding fetch resolves
//! to `None` and the view leaves its state alone.

use std::future::Future;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope that is disposed together with this one
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Handle that can dispose the scope from elsewhere
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn dispose(&self) {
        self.token.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` unless the scope is disposed first
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_disposed() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

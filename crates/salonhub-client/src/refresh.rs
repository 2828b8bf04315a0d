//! Single-flight token refresh.
//!
//! The first request to hit a 401 becomes the refresh leader. Requests that
//! hit a 401 while the leader is working park in the coordinator's queue and
//! are settled as one batch when the leader finishes. The in-progress flag is
//! reset by the leader's drop guard, so a panicking or cancelled refresh never
//! leaves the client stuck.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Obtains a replacement bearer token after the server rejected the current one.
#[async_trait]
pub trait TokenRefresher: Send + Sync + std::fmt::Debug + 'static {
    /// Return a fresh token, or an error if the session cannot be renewed.
    async fn refresh(&self) -> Result<String, ApiError>;
}

/// Refresher for deployments without a refresh endpoint: always fails, which
/// signs the user out.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailClosedRefresher;

#[async_trait]
impl TokenRefresher for FailClosedRefresher {
    async fn refresh(&self) -> Result<String, ApiError> {
        Err(ApiError::Refresh(
            "no refresh endpoint is configured".to_string(),
        ))
    }
}

/// `Some(token)` when the refresh succeeded, `None` when it failed.
type Outcome = Option<String>;

#[derive(Debug, Default)]
struct RefreshState {
    in_progress: bool,
    waiters: VecDeque<oneshot::Sender<Outcome>>,
}

/// Owns the in-progress flag and the queue of parked requests.
///
/// Each [`crate::ApiClient`] has its own coordinator.
#[derive(Debug)]
pub struct RefreshCoordinator {
    /// Flag and queue, always updated together.
    state: Mutex<RefreshState>,
    /// Maximum number of parked requests.
    capacity: usize,
    /// Number of refreshes started.
    attempts: AtomicU64,
}

/// Role assigned to a request that needs a fresh token.
pub enum RefreshTicket<'a> {
    /// No refresh was running; the caller must perform one and settle it.
    Leader(RefreshLeader<'a>),
    /// A refresh is running; wait for its outcome.
    Waiter(PendingRefresh),
    /// A refresh is running and the queue is full.
    Overflow,
}

impl RefreshCoordinator {
    /// Creates a coordinator that parks at most `capacity` requests.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(RefreshState::default()),
            capacity,
            attempts: AtomicU64::new(0),
        }
    }

    /// Joins the current refresh, or starts one if none is running.
    pub fn begin(&self) -> RefreshTicket<'_> {
        let mut state = self.lock();
        if state.in_progress {
            if state.waiters.len() >= self.capacity {
                return RefreshTicket::Overflow;
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            debug!(queued = state.waiters.len(), "Parked request behind token refresh");
            return RefreshTicket::Waiter(PendingRefresh { rx });
        }

        state.in_progress = true;
        self.attempts.fetch_add(1, Ordering::SeqCst);
        RefreshTicket::Leader(RefreshLeader {
            coordinator: self,
            settled: false,
        })
    }

    /// Whether a refresh is running.
    pub fn in_progress(&self) -> bool {
        self.lock().in_progress
    }

    /// Number of requests parked behind the running refresh.
    pub fn pending(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Number of refreshes started since creation.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Clears the flag and settles every parked request with `outcome`.
    fn finish(&self, outcome: Outcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_progress = false;
            std::mem::take(&mut state.waiters)
        };

        let released = waiters.len();
        for waiter in waiters {
            // A waiter whose future was dropped has nobody left to notify.
            let _ = waiter.send(outcome.clone());
        }
        released
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the request performing the refresh.
///
/// Dropping it without calling [`resolve`](Self::resolve) or
/// [`reject`](Self::reject) rejects all parked requests.
pub struct RefreshLeader<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLeader<'_> {
    /// Hands `token` to every parked request. Returns how many were released.
    pub fn resolve(mut self, token: String) -> usize {
        self.settled = true;
        self.coordinator.finish(Some(token))
    }

    /// Fails every parked request. Returns how many were released.
    pub fn reject(mut self) -> usize {
        self.settled = true;
        self.coordinator.finish(None)
    }
}

impl Drop for RefreshLeader<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let released = self.coordinator.finish(None);
            warn!(released, "Token refresh abandoned, failing parked requests");
        }
    }
}

/// A parked request waiting for the running refresh.
pub struct PendingRefresh {
    rx: oneshot::Receiver<Outcome>,
}

impl PendingRefresh {
    /// The refreshed token, or `None` if the refresh failed or was abandoned.
    pub async fn wait(self) -> Option<String> {
        self.rx.await.ok().flatten()
    }
}

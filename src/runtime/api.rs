//! Async facade over [`Elevator`] for tokio applications.
//!
//! Requests are cheap and non-blocking, so they are forwarded as-is. Waiting
//! for the car to drain blocks on the shared condvar, so that wait runs on
//! tokio's blocking pool.

use std::time::Duration;

use tracing::debug;

use crate::core::coordinator::wait_offline;
use crate::core::{Elevator, ElevatorError, PetId};

impl Elevator {
    /// Async form of [`Elevator::issue_request`].
    ///
    /// # Errors
    ///
    /// Same as [`Elevator::issue_request`].
    #[allow(clippy::unused_async)]
    pub async fn issue_request_async(
        &self,
        origin: i32,
        destination: i32,
        kind: i32,
    ) -> Result<PetId, ElevatorError> {
        self.issue_request(origin, destination, kind)
    }

    /// Async form of [`Elevator::wait_until_offline`].
    ///
    /// # Errors
    ///
    /// `Timeout` if the car is still running after `timeout`, `Interrupted` if
    /// an actor faulted or the blocking task was cancelled.
    pub async fn wait_until_offline_async(&self, timeout: Duration) -> Result<(), ElevatorError> {
        let shared = self.shared();
        tokio::task::spawn_blocking(move || wait_offline(&shared, timeout))
            .await
            .map_err(|e| ElevatorError::Interrupted(format!("offline wait task failed: {e}")))??;
        debug!("Elevator offline (async wait)");
        self.reap()
    }
}

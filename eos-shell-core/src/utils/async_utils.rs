//! Asynchronous Utilities.
//!
//! Thin wrappers over the `tokio` runtime used by the domain layer to run
//! background watchers and to bound waits on change notifications.

use std::future::Future;
use std::time::Duration;
use tokio::task::{spawn, JoinHandle};
use tokio::time;

/// Spawns a new asynchronous task on the Tokio runtime.
///
/// # Examples
///
/// ```
/// use eos_shell_core::utils::async_utils::spawn_task;
///
/// #[tokio::main]
/// async fn main() {
///     let handle = spawn_task(async { "done".to_string() });
///     assert_eq!(handle.await.unwrap(), "done");
/// }
/// ```
pub fn spawn_task<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    spawn(future)
}

/// Runs `future`, giving up after `duration`.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, time::error::Elapsed>
where
    F: Future<Output = T>,
{
    time::timeout(duration, future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_task_returns_output() {
        let handle = spawn_task(async { 40 + 2 });
        assert_eq!(handle.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_elapses_on_pending_future() {
        let result = timeout(Duration::from_millis(10), std::future::pending::<()>()).await;
        assert!(result.is_err());
    }
}

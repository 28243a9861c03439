//! Cancellable lazy text-fragment sequence.
//!
//! [`TextStream`] is the consuming side of a streamed completion: fragments
//! arrive over a `tokio::sync::mpsc` channel fed by a transport task.  The
//! stream is finite and not restartable.  Dropping it (or calling
//! [`TextStream::close`]) aborts the transport task, so a partially
//! consumed stream never leaks a connection.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::gateway::AiError;

/// Channel capacity for in-flight fragments.  Small on purpose — the
/// transport task applies backpressure instead of buffering a whole reply.
pub(crate) const FRAGMENT_CHANNEL_CAPACITY: usize = 32;

// ---------------------------------------------------------------------------
// TextStream
// ---------------------------------------------------------------------------

/// An asynchronous sequence of text fragments from a streamed completion.
///
/// * `Some(Ok(fragment))` — the next fragment, in arrival order.
/// * `Some(Err(e))`       — the stream failed mid-flight; no further items
///   will follow.
/// * `None`               — clean exhaustion.
pub struct TextStream {
    rx: mpsc::Receiver<Result<String, AiError>>,
    task: Option<JoinHandle<()>>,
}

impl TextStream {
    /// Wrap a fragment channel and (optionally) the transport task feeding
    /// it.  Test doubles pass `None` for the task.
    pub fn new(
        rx: mpsc::Receiver<Result<String, AiError>>,
        task: Option<JoinHandle<()>>,
    ) -> Self {
        Self { rx, task }
    }

    /// Build a stream that yields the given items and then ends.
    /// Intended for test doubles and the disabled gateway.
    pub fn from_items(items: Vec<Result<String, AiError>>) -> Self {
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            // The channel was sized to hold every item, so this never fails.
            let _ = tx.try_send(item);
        }
        Self::new(rx, None)
    }

    /// Await the next fragment.  Returns `None` when the stream is
    /// exhausted (transport task finished and the channel drained).
    pub async fn next(&mut self) -> Option<Result<String, AiError>> {
        self.rx.recv().await
    }

    /// Explicitly cancel the stream.  Equivalent to dropping it; provided
    /// so call sites can make early termination visible.
    pub fn close(self) {}
}

impl Drop for TextStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_items_in_order_then_ends() {
        let mut stream = TextStream::from_items(vec![
            Ok("Hel".to_string()),
            Ok("lo".to_string()),
        ]);

        assert_eq!(stream.next().await.unwrap().unwrap(), "Hel");
        assert_eq!(stream.next().await.unwrap().unwrap(), "lo");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn error_item_is_delivered() {
        let mut stream =
            TextStream::from_items(vec![Err(AiError::EmptyResponse)]);
        match stream.next().await {
            Some(Err(AiError::EmptyResponse)) => {}
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_aborts_transport_task() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        /// Sets the flag when the transport future is torn down.
        struct SetOnDrop(Arc<AtomicBool>);
        impl Drop for SetOnDrop {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let torn_down = Arc::new(AtomicBool::new(false));
        let probe = Arc::clone(&torn_down);

        let (tx, rx) = mpsc::channel(FRAGMENT_CHANNEL_CAPACITY);
        let task = tokio::spawn(async move {
            let _guard = SetOnDrop(probe);
            let _ = tx.send(Ok("tick".to_string())).await;
            // Park forever; only an abort releases the guard.
            std::future::pending::<()>().await;
        });

        let mut stream = TextStream::new(rx, Some(task));
        assert!(stream.next().await.is_some());
        stream.close();

        // The abort lands at the task's next scheduling point.
        for _ in 0..50 {
            if torn_down.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("transport task survived close()");
    }
}

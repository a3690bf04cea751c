//! Bounded publish queue with drop-oldest overflow.
//!
//! Decouples the fixed-rate poller from the Zenoh publisher. When the
//! publisher falls behind and the queue is at capacity, the oldest
//! sample is discarded so subscribers always see the freshest data.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

/// A bounded FIFO queue shared between one producer and one consumer.
pub struct SampleQueue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for SampleQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T> {
    capacity: usize,
    state: Mutex<State<T>>,
    notify: Notify,
}

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> SampleQueue<T> {
    /// Create a queue holding at most `capacity` samples.
    pub fn bounded(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        Self {
            inner: Arc::new(Inner {
                capacity,
                state: Mutex::new(State {
                    items: VecDeque::with_capacity(capacity),
                    closed: false,
                }),
                notify: Notify::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // The critical sections never panic, but recover anyway.
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Push a sample, dropping the oldest one if the queue is full.
    ///
    /// Returns `true` if an old sample was dropped to make room.
    /// Pushing to a closed queue discards the sample.
    pub fn push(&self, item: T) -> bool {
        let dropped;
        {
            let mut state = self.lock();
            if state.closed {
                return false;
            }
            dropped = if state.items.len() == self.inner.capacity {
                state.items.pop_front();
                true
            } else {
                false
            };
            state.items.push_back(item);
        }
        self.inner.notify.notify_one();
        dropped
    }

    /// Pop the oldest sample, waiting until one is available.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            // Register for notification before checking state, so a
            // push between the check and the await is not missed.
            let notified = self.inner.notify.notified();
            {
                let mut state = self.lock();
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Close the queue, waking the consumer.
    ///
    /// Samples already queued can still be popped.
    pub fn close(&self) {
        self.lock().closed = true;
        self.inner.notify.notify_waiters();
        self.inner.notify.notify_one();
    }

    /// Number of samples currently queued.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = SampleQueue::bounded(10);
        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.pop().await, Some(1));
        assert_eq!(queue.pop().await, Some(2));
        assert_eq!(queue.pop().await, Some(3));
    }

    #[tokio::test]
    async fn test_overflow_drops_oldest() {
        let queue = SampleQueue::bounded(3);
        assert!(!queue.push(1));
        assert!(!queue.push(2));
        assert!(!queue.push(3));
        // Full: 4 and 5 evict 1 and 2.
        assert!(queue.push(4));
        assert!(queue.push(5));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().await, Some(3));
        assert_eq!(queue.pop().await, Some(4));
        assert_eq!(queue.pop().await, Some(5));
    }

    #[tokio::test]
    async fn test_pop_waits_for_push() {
        let queue = SampleQueue::bounded(10);
        let consumer = queue.clone();

        let handle = tokio::spawn(async move { consumer.pop().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(42);

        assert_eq!(handle.await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_close_wakes_consumer() {
        let queue: SampleQueue<u32> = SampleQueue::bounded(10);
        let consumer = queue.clone();

        let handle = tokio::spawn(async move { consumer.pop().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();

        assert_eq!(handle.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_close_drains_remaining() {
        let queue = SampleQueue::bounded(10);
        queue.push(1);
        queue.push(2);
        queue.close();

        assert_eq!(queue.pop().await, Some(1));
        assert_eq!(queue.pop().await, Some(2));
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn test_push_after_close_discards() {
        let queue = SampleQueue::bounded(10);
        queue.close();

        assert!(!queue.push(1));
        assert_eq!(queue.pop().await, None);
    }
}

//! Print event channel and subscription gate
//!
//! A bounded FIFO queue of box ids awaiting physical printing, drained
//! by at most one subscriber at a time. Ids published while nobody is
//! subscribed stay queued (up to capacity) and are delivered to the
//! next subscriber in original order. Nothing survives a restart and
//! there is no redelivery: delivery is at-most-once.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedSemaphorePermit, Semaphore, mpsc};

/// Queue capacity: a soft backpressure limit, publishers wait for
/// space rather than dropping events.
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

#[derive(Debug, Error)]
pub enum SubscribeError {
    /// Another subscriber already holds the stream
    #[error("label event stream already has a subscriber")]
    Conflict,
}

/// Shared print-event channel
///
/// One instance per process, constructed at startup and handed to the
/// route layer as an explicit collaborator.
#[derive(Clone)]
pub struct PrintEvents {
    tx: mpsc::Sender<i64>,
    rx: Arc<Mutex<mpsc::Receiver<i64>>>,
    gate: Arc<Semaphore>,
}

impl PrintEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            gate: Arc::new(Semaphore::new(1)),
        }
    }

    /// Announce that a box label wants printing.
    ///
    /// Suspends while the queue is full. Cannot fail in practice: the
    /// channel stays open for the lifetime of self.
    pub async fn publish(&self, box_id: i64) -> Result<(), SendError<i64>> {
        self.tx.send(box_id).await?;
        tracing::debug!(box_id, "Published label print event");
        Ok(())
    }

    /// Claim the subscriber slot, non-blocking.
    ///
    /// At most one subscription is live at a time; a second caller is
    /// rejected immediately with [`SubscribeError::Conflict`] instead
    /// of waiting. The returned subscription owns the gate permit and
    /// the receiver, so dropping it — normal end, client disconnect,
    /// handler error, shutdown — frees the slot for the next caller.
    pub fn try_subscribe(&self) -> Result<EventSubscription, SubscribeError> {
        let permit = self
            .gate
            .clone()
            .try_acquire_owned()
            .map_err(|_| SubscribeError::Conflict)?;

        // The previous holder may still be tearing down for an instant
        // after its permit is returned; treat that as a conflict too.
        let rx = self
            .rx
            .clone()
            .try_lock_owned()
            .map_err(|_| SubscribeError::Conflict)?;

        tracing::info!("Label event subscriber attached");
        Ok(EventSubscription {
            rx,
            _permit: permit,
        })
    }
}

impl Default for PrintEvents {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

/// Exclusive hold on the print-event stream
///
/// Field order matters: the receiver guard is released before the gate
/// permit, so a successful `try_acquire_owned` implies the receiver is
/// free or about to be.
pub struct EventSubscription {
    rx: OwnedMutexGuard<mpsc::Receiver<i64>>,
    _permit: OwnedSemaphorePermit,
}

impl EventSubscription {
    /// Wait for the next queued box id, oldest first.
    pub async fn next_id(&mut self) -> Option<i64> {
        self.rx.recv().await
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        tracing::info!("Label event subscriber detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fifo_order() {
        let events = PrintEvents::new(8);

        events.publish(3).await.unwrap();
        events.publish(1).await.unwrap();
        events.publish(4).await.unwrap();

        let mut sub = events.try_subscribe().unwrap();
        assert_eq!(sub.next_id().await, Some(3));
        assert_eq!(sub.next_id().await, Some(1));
        assert_eq!(sub.next_id().await, Some(4));
    }

    #[tokio::test]
    async fn test_second_subscriber_conflicts() {
        let events = PrintEvents::new(8);

        let sub = events.try_subscribe().unwrap();
        assert!(matches!(
            events.try_subscribe(),
            Err(SubscribeError::Conflict)
        ));

        drop(sub);
        assert!(events.try_subscribe().is_ok());
    }

    #[tokio::test]
    async fn test_events_queued_before_subscribe_are_delivered() {
        let events = PrintEvents::new(8);
        events.publish(9).await.unwrap();

        let mut sub = events.try_subscribe().unwrap();
        assert_eq!(sub.next_id().await, Some(9));
    }

    #[tokio::test]
    async fn test_publish_backpressure_when_full() {
        let events = PrintEvents::new(1);
        events.publish(1).await.unwrap();

        // Queue full: a second publish must suspend until consumption
        let pending = {
            let events = events.clone();
            tokio::spawn(async move { events.publish(2).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!pending.is_finished(), "publish should wait for space");

        let mut sub = events.try_subscribe().unwrap();
        assert_eq!(sub.next_id().await, Some(1));
        pending.await.unwrap().unwrap();
        assert_eq!(sub.next_id().await, Some(2));
    }
}

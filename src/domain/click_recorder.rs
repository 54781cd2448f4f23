//! Fire-and-forget entry point for click logging.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::click_event::ClickEvent;

/// Sending half of the click queue.
///
/// [`ClickRecorder::record`] never blocks and never fails: when the queue is
/// full or the worker is gone the event is dropped and logged.
#[derive(Debug, Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickEvent>,
}

impl ClickRecorder {
    pub fn new(sender: mpsc::Sender<ClickEvent>) -> Self {
        Self { sender }
    }

    /// Creates a recorder together with the receiver the worker consumes.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Queues a click event for the background worker.
    pub fn record(&self, event: ClickEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(ev)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
                warn!(link_id = ev.link_id, "click queue full, dropping click event");
            }
            Err(TrySendError::Closed(ev)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_closed").increment(1);
                warn!(link_id = ev.link_id, "click worker stopped, dropping click event");
            }
        }
    }

    /// Returns true while the worker side of the queue is alive.
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Free slots left in the queue.
    pub fn remaining_capacity(&self) -> usize {
        self.sender.capacity()
    }

    /// Total queue size.
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

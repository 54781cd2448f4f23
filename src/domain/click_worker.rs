//! Background worker persisting queued click events.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;

/// Consumes click events until every sender is dropped.
///
/// Each event is classified and written in its own task; at most
/// `concurrency` writes are in flight. Failed writes are logged and counted,
/// never retried. Once the channel closes the worker waits for the queued
/// and in-flight events before returning, which is what shutdown awaits.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn ClickRepository>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        tasks.spawn(async move {
            let _permit = permit;
            persist_click(repository.as_ref(), event).await;
        });

        while let Some(finished) = tasks.try_join_next() {
            log_join_error(finished);
        }
    }

    debug!(pending = tasks.len(), "click queue closed, draining");
    while let Some(finished) = tasks.join_next().await {
        log_join_error(finished);
    }

    info!("Click worker stopped");
}

/// Writes one click event. Returns whether the write succeeded.
pub async fn persist_click(repository: &dyn ClickRepository, event: ClickEvent) -> bool {
    let link_id = event.link_id;

    match repository.record_click(event.into_new_click()).await {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(link_id, click_id = click.id, "click recorded");
            true
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            warn!(link_id, error = %e, "failed to record click");
            false
        }
    }
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "click task aborted");
    }
}

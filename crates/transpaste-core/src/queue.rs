//! Serialized execution of interception cycles.
//!
//! Without a queue, two rapid gestures produce two overlapping cycles whose
//! dispatches can interleave. The queue hands cycles to a single long-lived
//! worker that runs them one at a time in arrival order. Suppression of the
//! original event still happens immediately, before a cycle is queued.

use futures_channel::mpsc;
use futures_util::StreamExt;

use crate::error::InterceptError;
use crate::intercept::{Cycle, Interceptor};
use crate::platform::{Dom, InsertionPlatform};
use crate::transcode::ImageCodec;

/// Sending half: submit intercepted cycles.
pub struct CycleQueue<D: Dom> {
    tx: mpsc::UnboundedSender<Cycle<D>>,
}

/// Receiving half: drained by exactly one worker task.
pub struct CycleWorker<D: Dom> {
    rx: mpsc::UnboundedReceiver<Cycle<D>>,
}

/// Create a queue and its worker.
pub fn cycle_queue<D: Dom>() -> (CycleQueue<D>, CycleWorker<D>) {
    let (tx, rx) = mpsc::unbounded();
    (CycleQueue { tx }, CycleWorker { rx })
}

impl<D: Dom> CycleQueue<D> {
    pub fn submit(&self, cycle: Cycle<D>) -> Result<(), InterceptError> {
        let id = cycle.id();
        self.tx
            .unbounded_send(cycle)
            .map_err(|_| InterceptError::QueueClosed)?;
        tracing::trace!(id, "cycle queued");
        Ok(())
    }

    /// Stop accepting cycles. The worker finishes what is already queued.
    pub fn close(&self) {
        self.tx.close_channel();
    }
}

impl<D: Dom> CycleWorker<D> {
    /// Run queued cycles until the queue is closed or dropped.
    ///
    /// Cycle errors are logged by [`Interceptor::run`] and do not stop the
    /// worker.
    pub async fn drain<P, C>(mut self, interceptor: &Interceptor<P, C>)
    where
        P: InsertionPlatform<Dom = D>,
        C: ImageCodec,
    {
        while let Some(cycle) = self.rx.next().await {
            let _ = interceptor.run(cycle).await;
        }
        tracing::debug!("cycle queue drained");
    }
}

//! Change notification for store snapshots.

use tokio::sync::watch;

/// Holds the latest value of a collection and hands it to subscribers.
///
/// Backed by a `watch` channel, so publishing never blocks and works
/// without an async runtime; receivers can poll `has_changed` or await
/// `changed` if the host runs one.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the current value and wakes every subscriber.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Receiver that starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

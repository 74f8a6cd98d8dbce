use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::state::types::AppMessage;
use crate::types::CatalogSnapshot;

use super::CatalogSource;

/// Handle for a running list subscription. Dropping it stops the poller.
pub(crate) struct Subscription {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Polls `source` every `interval` and pushes a `CatalogPushed` message when
/// the snapshot differs from the last one seen. Fetch failures are logged and
/// skipped; the poller exits once the receiving side hangs up.
pub(crate) fn subscribe(
    source: Arc<dyn CatalogSource>,
    interval: Duration,
    sender: mpsc::Sender<AppMessage>,
) -> Subscription {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        let mut last: Option<CatalogSnapshot> = None;
        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let snapshot = match source.fetch(false) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    log::debug!("list subscription poll failed: {}", err);
                    continue;
                }
            };

            if last.as_ref() == Some(&snapshot) {
                continue;
            }
            last = Some(snapshot.clone());

            log::debug!(
                "list subscription pushing {} apps",
                snapshot.total_len()
            );
            if sender.send(AppMessage::CatalogPushed { snapshot }).is_err() {
                break;
            }
        }
    });

    Subscription {
        stop: Some(stop_tx),
        handle: Some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockManager;
    use crate::types::record;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn pushes_only_changed_snapshots() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut source = MockManager::new();
        source.expect_fetch().returning(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let version = if n < 3 { "1.0" } else { "2.0" };
            Ok(CatalogSnapshot {
                installed: vec![record("nav", version, "2.0", false)],
                available: Vec::new(),
            })
        });

        let (tx, rx) = mpsc::channel();
        let subscription = subscribe(Arc::new(source), Duration::from_millis(5), tx);

        let first = rx.recv_timeout(Duration::from_secs(2)).expect("first push");
        let second = rx.recv_timeout(Duration::from_secs(2)).expect("second push");
        drop(subscription);

        let versions: Vec<String> = [first, second]
            .into_iter()
            .map(|message| match message {
                AppMessage::CatalogPushed { snapshot } => snapshot.installed[0].version.clone(),
                _ => panic!("unexpected message"),
            })
            .collect();
        assert_eq!(versions, vec!["1.0", "2.0"]);
        assert!(calls.load(Ordering::SeqCst) >= 4);
    }
}

//! Download status shared between the update pipeline and its observers.

use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::types::{DownloadStatus, StatusPatch};

/// Event name under which status changes are published.
pub const DOWNLOAD_STATUS_EVENT: &str = "downloadStatus";

pub struct StatusChannel {
    current: Mutex<DownloadStatus>,
    sender: broadcast::Sender<DownloadStatus>,
}

impl StatusChannel {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            current: Mutex::new(DownloadStatus::default()),
            sender,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DownloadStatus> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Restores the idle status and broadcasts it.
    pub fn reset(&self) -> DownloadStatus {
        let mut current = self.lock();
        *current = DownloadStatus::default();
        self.publish(&current);
        current.clone()
    }

    /// Merges `patch` into the current status and broadcasts the result.
    pub fn update(&self, patch: StatusPatch) -> DownloadStatus {
        let mut current = self.lock();
        patch.apply_to(&mut current);
        self.publish(&current);
        current.clone()
    }

    /// Returns to idle only if the status still shows a finished run, so a
    /// newer attempt is not clobbered.
    pub fn reset_if_complete(&self) -> bool {
        let mut current = self.lock();
        if !current.complete || current.run {
            return false;
        }
        *current = DownloadStatus::default();
        self.publish(&current);
        true
    }

    #[must_use]
    pub fn current(&self) -> DownloadStatus {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DownloadStatus> {
        self.sender.subscribe()
    }

    fn publish(&self, status: &DownloadStatus) {
        tracing::debug!(
            progress = status.progress,
            run = status.run,
            complete = status.complete,
            error = status.error,
            "{}",
            status.info
        );
        // No subscribers is fine
        let _ = self.sender.send(status.clone());
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_broadcasts_full_status() {
        let channel = StatusChannel::default();
        let mut rx = channel.subscribe();

        channel.update(StatusPatch::progress(0).with_run(true).with_info("Downloading"));
        channel.update(StatusPatch::progress(50));

        let first = rx.try_recv().unwrap();
        assert!(first.run);
        assert_eq!(first.progress, 0);

        let second = rx.try_recv().unwrap();
        assert!(second.run);
        assert_eq!(second.progress, 50);
        assert_eq!(second.info, "Downloading");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let channel = StatusChannel::default();
        channel.update(StatusPatch::failed("boom"));
        assert!(channel.current().error);

        let status = channel.reset();
        assert_eq!(status, DownloadStatus::default());
        assert_eq!(channel.current(), DownloadStatus::default());
    }

    #[test]
    fn test_reset_if_complete() {
        let channel = StatusChannel::default();
        channel.update(StatusPatch::progress(30).with_run(true));
        assert!(!channel.reset_if_complete());
        assert_eq!(channel.current().progress, 30);

        channel.update(StatusPatch::completed("done"));
        assert!(channel.reset_if_complete());
        assert_eq!(channel.current(), DownloadStatus::default());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let channel = StatusChannel::default();
        let status = channel.update(StatusPatch::progress(10));
        assert_eq!(status.progress, 10);
        assert_eq!(channel.current().progress, 10);
    }

    #[test]
    fn test_late_subscriber_reads_current() {
        let channel = StatusChannel::default();
        channel.update(StatusPatch::completed("done"));

        let mut rx = channel.subscribe();
        assert!(rx.try_recv().is_err());
        assert!(channel.current().complete);
    }
}

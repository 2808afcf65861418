use super::stage::Stage;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// One download progress tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
    pub bytes_per_second: f64,
}

impl DownloadProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) | None => None,
            Some(total) => Some(self.bytes_downloaded as f64 / total as f64 * 100.0),
        }
    }

    pub fn status_line(&self) -> String {
        let rate = self.bytes_per_second / BYTES_PER_MEGABYTE;
        match self.percent() {
            Some(percent) => format!("Downloading: {:.0}% {:.2}MB/s", percent, rate),
            None => format!(
                "Downloading: {:.2}MB {:.2}MB/s",
                self.bytes_downloaded as f64 / BYTES_PER_MEGABYTE,
                rate
            ),
        }
    }
}

/// Side-channel notifications emitted while an install runs.
#[derive(Debug, Clone, PartialEq)]
pub enum InstallEvent {
    /// Visibility of the busy indicator.
    Busy(bool),
    Stage(Stage),
    Progress(DownloadProgress),
    Succeeded,
    Failed(&'static str),
}

impl InstallEvent {
    /// Single-line status text for display, if the event carries one.
    pub fn status_line(&self) -> Option<String> {
        match self {
            InstallEvent::Busy(_) => None,
            InstallEvent::Stage(stage) => stage.status_text().map(str::to_string),
            InstallEvent::Progress(progress) => Some(progress.status_line()),
            InstallEvent::Succeeded => Some("Modpack Successfully Installed".to_string()),
            InstallEvent::Failed(message) => Some((*message).to_string()),
        }
    }
}

/// Receives [`InstallEvent`]s. Never influences control flow.
pub trait InstallObserver: Send + Sync {
    fn on_event(&self, event: &InstallEvent);
}

/// Discards every event.
pub struct NoopObserver;

impl InstallObserver for NoopObserver {
    fn on_event(&self, _event: &InstallEvent) {}
}

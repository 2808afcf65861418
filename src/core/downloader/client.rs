use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::core::error::{InstallerError, InstallerResult};
use crate::core::http::build_http_client;
use crate::core::install::observer::{DownloadProgress, InstallEvent, InstallObserver};
use crate::core::link::DownloadLink;

/// Minimum spacing between two progress ticks.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Transfers a modpack archive to a local file.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Writes the archive behind `link` to `dest`, reporting progress to `observer`.
    async fn fetch(
        &self,
        link: &DownloadLink,
        dest: &Path,
        observer: &dyn InstallObserver,
        cancel: &CancellationToken,
    ) -> InstallerResult<()>;
}

/// Streaming HTTP downloader.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> InstallerResult<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArchiveFetcher for Downloader {
    #[instrument(skip(self, link, observer, cancel), fields(url = %link))]
    async fn fetch(
        &self,
        link: &DownloadLink,
        dest: &Path,
        observer: &dyn InstallObserver,
        cancel: &CancellationToken,
    ) -> InstallerResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| InstallerError::io(parent, source))?;
        }

        let response = self.client.get(link.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::DownloadFailed {
                url: link.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        info!("Downloading {} ({:?} bytes)", link, total_bytes);

        // Handle is dropped at the end of the block, before extraction reopens the file.
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|source| InstallerError::io(dest, source))?;

            let mut stream = response.bytes_stream();
            let mut ticker = ProgressTicker::new(total_bytes);
            while let Some(chunk) = stream.next().await {
                if cancel.is_cancelled() {
                    return Err(InstallerError::Cancelled);
                }
                let chunk = chunk?;
                file.write_all(&chunk)
                    .await
                    .map_err(|source| InstallerError::io(dest, source))?;

                if let Some(progress) = ticker.advance(chunk.len() as u64) {
                    observer.on_event(&InstallEvent::Progress(progress));
                }
            }
            file.flush()
                .await
                .map_err(|source| InstallerError::io(dest, source))?;

            observer.on_event(&InstallEvent::Progress(ticker.finish()));
        }

        debug!("Downloaded: {} -> {:?}", link, dest);
        Ok(())
    }
}

/// Throttles progress reports and measures the transfer rate between them.
struct ProgressTicker {
    total_bytes: Option<u64>,
    downloaded: u64,
    started: Instant,
    last_tick: Instant,
    bytes_at_last_tick: u64,
}

impl ProgressTicker {
    fn new(total_bytes: Option<u64>) -> Self {
        let now = Instant::now();
        Self {
            total_bytes,
            downloaded: 0,
            started: now,
            last_tick: now,
            bytes_at_last_tick: 0,
        }
    }

    fn advance(&mut self, bytes: u64) -> Option<DownloadProgress> {
        self.downloaded = self.downloaded.saturating_add(bytes);
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        if elapsed < PROGRESS_INTERVAL {
            return None;
        }

        let delta = self.downloaded - self.bytes_at_last_tick;
        self.last_tick = now;
        self.bytes_at_last_tick = self.downloaded;
        Some(DownloadProgress {
            bytes_downloaded: self.downloaded,
            total_bytes: self.total_bytes,
            bytes_per_second: delta as f64 / elapsed.as_secs_f64(),
        })
    }

    /// Final tick, averaged over the whole transfer.
    fn finish(&self) -> DownloadProgress {
        let elapsed = self.started.elapsed().as_secs_f64();
        let bytes_per_second = if elapsed > 0.0 {
            self.downloaded as f64 / elapsed
        } else {
            0.0
        };
        DownloadProgress {
            bytes_downloaded: self.downloaded,
            total_bytes: self.total_bytes.or(Some(self.downloaded)),
            bytes_per_second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_throttles_small_chunks() {
        let mut ticker = ProgressTicker::new(Some(100));
        assert!(ticker.advance(10).is_none());
        assert!(ticker.advance(10).is_none());
        assert_eq!(ticker.downloaded, 20);
    }

    #[test]
    fn ticker_reports_after_interval() {
        let mut ticker = ProgressTicker::new(Some(100));
        ticker.last_tick -= PROGRESS_INTERVAL;
        let progress = ticker.advance(50).unwrap();
        assert_eq!(progress.bytes_downloaded, 50);
        assert_eq!(progress.percent(), Some(50.0));
        assert!(progress.bytes_per_second > 0.0);
    }

    #[test]
    fn finish_reports_full_transfer() {
        let mut ticker = ProgressTicker::new(None);
        ticker.advance(64);
        let progress = ticker.finish();
        assert_eq!(progress.total_bytes, Some(64));
        assert_eq!(progress.percent(), Some(100.0));
    }

    use std::sync::Mutex;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use crate::core::error::FailureReason;

    #[derive(Default)]
    struct Ticks(Mutex<Vec<DownloadProgress>>);

    impl InstallObserver for Ticks {
        fn on_event(&self, event: &InstallEvent) {
            if let InstallEvent::Progress(progress) = event {
                self.0.lock().unwrap().push(*progress);
            }
        }
    }

    /// Answers a single request with `response` verbatim and closes.
    async fn serve_once(response: Vec<u8>) -> DownloadLink {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
        });
        DownloadLink::parse(&format!("http://{addr}/pack.zip")).unwrap()
    }

    fn local_downloader() -> Downloader {
        Downloader::with_client(Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn body_is_written_with_a_final_full_tick() {
        let link = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello".to_vec(),
        )
        .await;
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("staging/modpack.zip");
        let ticks = Ticks::default();

        local_downloader()
            .fetch(&link, &dest, &ticks, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"hello");
        let ticks = ticks.0.lock().unwrap();
        let last = ticks.last().unwrap();
        assert_eq!(last.bytes_downloaded, 5);
        assert_eq!(last.percent(), Some(100.0));
    }

    #[tokio::test]
    async fn error_status_is_a_download_failure() {
        let link = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
        )
        .await;
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("modpack.zip");

        let err = local_downloader()
            .fetch(&link, &dest, &Ticks::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, InstallerError::DownloadFailed { status: 404, .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn truncated_body_is_a_download_error() {
        let link = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort".to_vec(),
        )
        .await;
        let tmp = tempfile::tempdir().unwrap();

        let err = local_downloader()
            .fetch(
                &link,
                &tmp.path().join("modpack.zip"),
                &Ticks::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.reason(), FailureReason::DownloadError);
    }

    #[tokio::test]
    async fn cancelled_token_stops_at_the_first_chunk() {
        let link = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello".to_vec(),
        )
        .await;
        let tmp = tempfile::tempdir().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let ticks = Ticks::default();

        let err = local_downloader()
            .fetch(&link, &tmp.path().join("modpack.zip"), &ticks, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, InstallerError::Cancelled));
        assert!(ticks.0.lock().unwrap().is_empty());
    }
}

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};
use url::Url;

use crate::structures::{Error, Event, PlanItem, Progress, ProgressCallback};

/// Value of the `User-Agent` header sent with every request.
pub(crate) fn user_agent() -> String {
  format!("TTR-Patcher ({})", env!("CARGO_PKG_VERSION"))
}

// At most one DownloadProgress event per this many bytes, so slow UI
// callbacks cannot throttle the transfer itself.
const PROGRESS_STEP: u64 = 256 * 1024;

/// Bridges the transfer crate's byte accounting onto the event sink and
/// the shared run counters.
struct DownloadProgress {
  path: String,
  callback: ProgressCallback,
  global: Progress,
  bytes: u64,
  total: Option<u64>,
  last_reported: u64,
}

#[async_trait]
impl download_async::Progress for DownloadProgress {
  async fn set_file_size(&mut self, size: usize) {
    if size > 0 {
      self.total = Some(size as u64);
    }
  }

  async fn add_to_progress(&mut self, amount: usize) {
    self.bytes += amount as u64;
    self.global.add_downloaded_bytes(amount as u64);
    if self.bytes - self.last_reported >= PROGRESS_STEP || Some(self.bytes) == self.total {
      self.last_reported = self.bytes;
      (self.callback)(Event::DownloadProgress {
        path: &self.path,
        bytes: self.bytes,
        total: self.total,
      });
    }
  }

  async fn remove_from_progress(&mut self, amount: usize) {
    self.bytes = self.bytes.saturating_sub(amount as u64);
    self.global.remove_downloaded_bytes(amount as u64);
  }
}

/// Streams one remote object into `dest` inside the staging area and
/// returns the number of bytes written. A failed or cancelled transfer
/// leaves its partial file behind; the orchestrator's cleanup removes it
/// together with the staging directory.
#[instrument(skip_all, fields(path = %item.entry.path, dl = %item.entry.download_name))]
pub(crate) async fn download_file(
  download_url: &Url,
  item: &PlanItem,
  dest: &Path,
  callback: ProgressCallback,
  global: Progress,
  cancel: &CancellationToken,
) -> Result<u64, Error> {
  let url = download_url.join(&item.entry.download_name)?;
  info!("downloading {}", url);

  let mut downloader = download_async::Downloader::new();
  downloader.use_uri(url.as_str().parse::<download_async::http::Uri>()?);
  downloader.use_progress(DownloadProgress {
    path: item.entry.path.clone(),
    callback,
    global,
    bytes: 0,
    total: None,
    last_reported: 0,
  });
  let headers = downloader.headers().expect("Couldn't unwrap download_async headers option");
  headers.append("User-Agent", user_agent().parse().unwrap());
  downloader.allow_http();

  // The transfer crate writes into a synchronous sink.
  let mut file = std::fs::File::create(dest)?;
  let response = downloader.download(download_async::Body::empty(), &mut file);
  let parts = tokio::select! {
    result = response => result?,
    _ = cancel.cancelled() => return Err(Error::Cancelled()),
  };
  if !parts.status.is_success() {
    return Err(Error::DownloadFailed(parts.status));
  }
  file.flush()?;

  let byte_count = tokio::fs::metadata(dest).await?.len();
  info!("finished downloading {} ({} bytes)", item.entry.download_name, byte_count);
  Ok(byte_count)
}

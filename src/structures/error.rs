use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
  /// The caller-supplied install directory does not exist.
  InstallRootMissing(PathBuf),
  /// A synchronization run is already active on this `Patcher`.
  InProgress(),
  /// The run was aborted through the cancellation token.
  Cancelled(),
  /// A required builder parameter was never supplied.
  MissingParameter(&'static str),
  /// The host platform could not be mapped to a manifest identifier.
  UnknownPlatform(),
  InvalidUrl(url::ParseError),
  InvalidUri(download_async::http::uri::InvalidUri),
  DownloadError(download_async::Error),
  /// The server answered with a non-success status code.
  DownloadFailed(download_async::http::StatusCode),
  DownloadTimeout(tokio::time::error::Elapsed),
  NotUtf8(std::string::FromUtf8Error),

  /// Malformed manifest, first argument describes the offending part.
  InvalidManifest(String),
  /// A local file could not be hashed during verification, first argument is the manifest path.
  HashError(String, std::io::Error),
  /// Extracted output did not match the manifest digest: path, computed, expected.
  HashMismatch(String, String, String),
  IoError(std::io::Error),
  /// Corrupt or truncated bzip2 stream, first argument is the manifest path.
  DecompressionError(String, std::io::Error),
  JoinError(tokio::task::JoinError),
}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::InstallRootMissing(path) => write!(f, "install directory {} does not exist", path.display()),
      Self::InProgress() => write!(f, "a synchronization run is already in progress"),
      Self::Cancelled() => write!(f, "the run was cancelled"),
      Self::MissingParameter(name) => write!(f, "missing required parameter: {}", name),
      Self::UnknownPlatform() => write!(f, "could not determine a platform identifier for this host"),
      Self::InvalidUrl(error) => write!(f, "invalid url: {}", error),
      Self::InvalidUri(error) => write!(f, "invalid uri: {}", error),
      Self::DownloadError(error) => write!(f, "download failed: {}", error),
      Self::DownloadFailed(status) => write!(f, "server answered with status {}", status),
      Self::DownloadTimeout(error) => write!(f, "download timed out: {}", error),
      Self::NotUtf8(error) => write!(f, "response body is not valid utf-8: {}", error),
      Self::InvalidManifest(details) => write!(f, "invalid manifest: {}", details),
      Self::HashError(path, error) => write!(f, "unable to hash local file {}: {}", path, error),
      Self::HashMismatch(path, computed, expected) => {
        write!(f, "hash mismatch for {}: computed {}, expected {}", path, computed, expected)
      }
      Self::IoError(error) => write!(f, "io error: {}", error),
      Self::DecompressionError(path, error) => write!(f, "unable to decompress {}: {}", path, error),
      Self::JoinError(error) => write!(f, "background task failed: {}", error),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::InvalidUrl(error) => Some(error),
      Self::InvalidUri(error) => Some(error),
      Self::DownloadError(error) => Some(error),
      Self::DownloadTimeout(error) => Some(error),
      Self::NotUtf8(error) => Some(error),
      Self::HashError(_, error) => Some(error),
      Self::IoError(error) => Some(error),
      Self::DecompressionError(_, error) => Some(error),
      Self::JoinError(error) => Some(error),
      _ => None,
    }
  }
}

impl From<url::ParseError> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: url::ParseError) -> Self {
    log_error(&error);
    Self::InvalidUrl(error)
  }
}

impl From<download_async::http::uri::InvalidUri> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: download_async::http::uri::InvalidUri) -> Self {
    log_error(&error);
    Self::InvalidUri(error)
  }
}

impl From<download_async::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: download_async::Error) -> Self {
    log_error(&error);
    Self::DownloadError(error)
  }
}

impl From<tokio::time::error::Elapsed> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: tokio::time::error::Elapsed) -> Self {
    log_error(&error);
    Self::DownloadTimeout(error)
  }
}

impl From<std::io::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: std::io::Error) -> Self {
    log_error(&error);
    Self::IoError(error)
  }
}

impl From<std::string::FromUtf8Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: std::string::FromUtf8Error) -> Self {
    log_error(&error);
    Self::NotUtf8(error)
  }
}

impl From<tokio::task::JoinError> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: tokio::task::JoinError) -> Self {
    log_error(&error);
    Self::JoinError(error)
  }
}

impl From<json::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: json::Error) -> Self {
    log_error(&error);
    Self::InvalidManifest(format!("manifest is not valid JSON: {}", error))
  }
}

#[track_caller]
fn log_error(error: &(impl std::error::Error + ?Sized)) {
  tracing::error!("{:?}", error);
}

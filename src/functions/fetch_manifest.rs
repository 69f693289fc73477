use std::time::Duration;

use tracing::{info, instrument};
use url::Url;

use crate::functions::user_agent;
use crate::structures::{Error, PatchEntry, PatchManifest};
use crate::traits::AsString;

/// Downloads and parses the patch manifest. The manifest URL ends in
/// ".txt" but the body is JSON; that is how the server publishes it.
#[instrument(skip_all, fields(url = %manifest_url))]
pub(crate) async fn fetch_manifest(manifest_url: &Url, timeout: Duration) -> Result<PatchManifest, Error> {
  let mut downloader = download_async::Downloader::new();
  downloader.use_uri(manifest_url.as_str().parse::<download_async::http::Uri>()?);
  let headers = downloader.headers().expect("Couldn't unwrap download_async headers option");
  headers.append("User-Agent", user_agent().parse().unwrap());
  downloader.allow_http();

  let mut buffer = vec![];
  let response = downloader.download(download_async::Body::empty(), &mut buffer);
  let parts = tokio::time::timeout(timeout, response).await??;
  if !parts.status.is_success() {
    return Err(Error::DownloadFailed(parts.status));
  }

  let body = String::from_utf8(buffer)?;
  let manifest = parse_manifest(&body)?;
  info!("manifest declares {} file(s)", manifest.len());
  Ok(manifest)
}

/// Parses the manifest body. Every entry must carry `hash`, `only` and
/// `dl`; anything less makes the whole manifest unusable. An empty
/// manifest is rejected as well, it is never "nothing to update".
pub(crate) fn parse_manifest(body: &str) -> Result<PatchManifest, Error> {
  let parsed = json::parse(body)?;
  if !parsed.is_object() {
    return Err(Error::InvalidManifest("expected a JSON object keyed by file path".to_string()));
  }

  let mut entries = Vec::with_capacity(parsed.len());
  for (path, value) in parsed.entries() {
    let hash = value["hash"]
      .as_string_option()
      .ok_or_else(|| Error::InvalidManifest(format!("entry {} is missing \"hash\"", path)))?;
    let download_name = value["dl"]
      .as_string_option()
      .ok_or_else(|| Error::InvalidManifest(format!("entry {} is missing \"dl\"", path)))?;
    if !value["only"].is_array() {
      return Err(Error::InvalidManifest(format!("entry {} is missing \"only\"", path)));
    }
    let platforms = value["only"]
      .members()
      .map(|platform| {
        platform
          .as_string_option()
          .ok_or_else(|| Error::InvalidManifest(format!("entry {} has a non-string platform", path)))
      })
      .collect::<Result<Vec<String>, Error>>()?;

    entries.push(PatchEntry {
      path: path.to_string(),
      hash,
      download_name,
      platforms,
    });
  }

  if entries.is_empty() {
    return Err(Error::InvalidManifest("manifest contains no entries".to_string()));
  }
  Ok(PatchManifest { entries })
}

#[cfg(test)]
mod tests {
  use super::parse_manifest;
  use crate::structures::Error;

  const MANIFEST: &str = r#"{
    "a.txt": {"hash": "AAF4C61D", "only": ["linux", "win64"], "dl": "a.bin"},
    "b.txt": {"hash": "deadbeef", "only": ["win32"], "dl": "b.bin"}
  }"#;

  #[test]
  fn parses_entries_in_declared_order() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.entries[0].path, "a.txt");
    assert_eq!(manifest.entries[0].hash, "AAF4C61D");
    assert_eq!(manifest.entries[0].download_name, "a.bin");
    assert_eq!(manifest.entries[0].platforms, vec!["linux", "win64"]);
    assert_eq!(manifest.entries[1].path, "b.txt");
  }

  #[test]
  fn rejects_invalid_json() {
    assert!(matches!(parse_manifest("not json"), Err(Error::InvalidManifest(_))));
  }

  #[test]
  fn rejects_non_object_body() {
    assert!(matches!(parse_manifest("[1, 2]"), Err(Error::InvalidManifest(_))));
  }

  #[test]
  fn rejects_empty_manifest() {
    assert!(matches!(parse_manifest("{}"), Err(Error::InvalidManifest(_))));
  }

  #[test]
  fn rejects_entry_missing_hash() {
    let body = r#"{"a.txt": {"only": ["linux"], "dl": "a.bin"}}"#;
    assert!(matches!(parse_manifest(body), Err(Error::InvalidManifest(_))));
  }

  #[test]
  fn rejects_entry_missing_dl() {
    let body = r#"{"a.txt": {"hash": "aa", "only": ["linux"]}}"#;
    assert!(matches!(parse_manifest(body), Err(Error::InvalidManifest(_))));
  }

  #[test]
  fn rejects_entry_missing_only() {
    let body = r#"{"a.txt": {"hash": "aa", "dl": "a.bin"}}"#;
    assert!(matches!(parse_manifest(body), Err(Error::InvalidManifest(_))));
  }
}

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use bzip2::read::BzDecoder;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::structures::{Error, Event, ProgressCallback};

/// Counts the compressed bytes the decoder has pulled so far. Extraction
/// progress is reported against the staged file's compressed size, since
/// the decompressed size is unknown up front.
struct CountingReader<R> {
  inner: R,
  bytes_read: u64,
}

impl<R: Read> Read for CountingReader<R> {
  fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
    let read = self.inner.read(buf)?;
    self.bytes_read += read as u64;
    Ok(read)
  }
}

/// Decompresses a staged bzip2 object into `dest`, streaming in fixed-size
/// chunks. Corrupt or truncated input surfaces as a decompression error;
/// faults on the output side stay io errors. The caller renames `dest`
/// into the install directory only after the stream completed, so a
/// partial write never clobbers an installed file.
pub(crate) fn extract_file(
  staged: &Path,
  dest: &Path,
  path: &str,
  callback: &ProgressCallback,
  cancel: &CancellationToken,
) -> Result<(), Error> {
  let compressed_size = staged.metadata()?.len();
  info!("extracting {} ({} compressed bytes) to {}", staged.display(), compressed_size, dest.display());

  let staged_file = File::open(staged)?;
  let mut decoder = BzDecoder::new(CountingReader { inner: BufReader::new(staged_file), bytes_read: 0 });
  let mut output = File::create(dest)?;

  let mut buffer = [0u8; 8192];
  let mut last_percent = 0u8;
  loop {
    if cancel.is_cancelled() {
      return Err(Error::Cancelled());
    }
    let read = decoder
      .read(&mut buffer)
      .map_err(|error| Error::DecompressionError(path.to_string(), error))?;
    if read == 0 {
      break;
    }
    output.write_all(&buffer[..read])?;

    let consumed = decoder.get_ref().bytes_read;
    let percent = if compressed_size == 0 {
      100
    } else {
      ((consumed * 100) / compressed_size).min(100) as u8
    };
    if percent != last_percent {
      last_percent = percent;
      callback(Event::ExtractProgress { path, percent });
    }
  }
  output.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::io::Write;
  use std::sync::Arc;

  use bzip2::write::BzEncoder;
  use bzip2::Compression;
  use tokio_util::sync::CancellationToken;

  use super::extract_file;
  use crate::structures::{Error, Event, ProgressCallback};

  fn no_op() -> ProgressCallback {
    Arc::new(|_| {})
  }

  fn compress(content: &[u8]) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap()
  }

  #[test]
  fn extracts_compressed_content() {
    let dir = tempfile::tempdir().unwrap();
    let staged = dir.path().join("a.bin");
    let dest = dir.path().join("a.out");
    std::fs::write(&staged, compress(b"hello world")).unwrap();

    extract_file(&staged, &dest, "a.txt", &no_op(), &CancellationToken::new()).unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
  }

  #[test]
  fn truncated_stream_is_a_decompression_error() {
    let dir = tempfile::tempdir().unwrap();
    let staged = dir.path().join("a.bin");
    let dest = dir.path().join("a.out");
    let compressed = compress(&vec![7u8; 64 * 1024]);
    std::fs::write(&staged, &compressed[..compressed.len() / 2]).unwrap();

    let result = extract_file(&staged, &dest, "a.txt", &no_op(), &CancellationToken::new());
    assert!(matches!(result, Err(Error::DecompressionError(path, _)) if path == "a.txt"));
  }

  #[test]
  fn garbage_input_is_a_decompression_error() {
    let dir = tempfile::tempdir().unwrap();
    let staged = dir.path().join("a.bin");
    let dest = dir.path().join("a.out");
    std::fs::write(&staged, b"this is not a bzip2 stream").unwrap();

    let result = extract_file(&staged, &dest, "a.txt", &no_op(), &CancellationToken::new());
    assert!(matches!(result, Err(Error::DecompressionError(_, _))));
  }

  #[test]
  fn cancelled_token_stops_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let staged = dir.path().join("a.bin");
    let dest = dir.path().join("a.out");
    std::fs::write(&staged, compress(b"hello world")).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = extract_file(&staged, &dest, "a.txt", &no_op(), &cancel);
    assert!(matches!(result, Err(Error::Cancelled())));
  }

  #[test]
  fn reports_extract_progress() {
    let dir = tempfile::tempdir().unwrap();
    let staged = dir.path().join("a.bin");
    let dest = dir.path().join("a.out");
    std::fs::write(&staged, compress(&vec![3u8; 256 * 1024])).unwrap();

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let callback: ProgressCallback = Arc::new(move |event| {
      if let Event::ExtractProgress { percent, .. } = event {
        seen_clone.lock().unwrap().push(percent);
      }
    });
    extract_file(&staged, &dest, "a.txt", &callback, &CancellationToken::new()).unwrap();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert_eq!(*seen.last().unwrap(), 100);
  }
}

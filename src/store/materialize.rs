//! Snapshot materialization
//!
//! The snapshot is an immutable, externally-produced zstd stream of a SQLite
//! database. Materialization decompresses it to the store path on first use
//! and never again: an existing store file is authoritative regardless of
//! snapshot freshness (documented limitation, not checked here).
//!
//! Decompression streams into a temp file in the store's directory and is
//! renamed onto the target only on success, so a failed or interrupted run
//! leaves no partial file behind the store path.

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Outcome of a materialization attempt.
#[derive(Debug)]
pub enum Materialization {
    /// The store file already existed; the snapshot was not read.
    Reused,
    /// The snapshot was decompressed onto the store path.
    Decompressed {
        /// Decompressed payload size.
        bytes: u64,
        /// blake3 of the decompressed payload.
        checksum: blake3::Hash,
    },
    /// Neither store nor snapshot exists; callers run without a store.
    Absent,
}

/// Ensure a store file exists at `store`, decompressing `snapshot` if needed.
pub fn materialize(snapshot: &Path, store: &Path) -> Result<Materialization> {
    if store.exists() {
        tracing::debug!("Store already materialized at {}", store.display());
        return Ok(Materialization::Reused);
    }
    if !snapshot.exists() {
        return Ok(Materialization::Absent);
    }

    let store_dir = match store.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    // Temp file lives next to the target so the final rename stays on one
    // filesystem and is atomic. Dropped (and deleted) on any error below.
    let src = File::open(snapshot)?;
    let tmp = tempfile::NamedTempFile::new_in(store_dir)?;

    let mut decoder =
        zstd::stream::Decoder::new(BufReader::new(src)).map_err(Error::Decompression)?;
    let mut writer = HashingWriter::new(BufWriter::new(tmp));

    let bytes = std::io::copy(&mut decoder, &mut writer).map_err(Error::Decompression)?;
    writer.flush().map_err(Error::Decompression)?;

    let (buffered, checksum) = writer.finish();
    let tmp = buffered
        .into_inner()
        .map_err(|e| Error::Decompression(e.into_error()))?;
    tmp.persist(store).map_err(|e| Error::Io(e.error))?;

    tracing::info!(
        "Materialized {} ({} bytes, blake3 {})",
        store.display(),
        bytes,
        checksum.to_hex()
    );
    Ok(Materialization::Decompressed { bytes, checksum })
}

/// Write adapter that hashes everything it forwards.
struct HashingWriter<W: Write> {
    inner: W,
    hasher: blake3::Hasher,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, hasher: blake3::Hasher::new() }
    }

    fn finish(self) -> (W, blake3::Hash) {
        (self.inner, self.hasher.finalize())
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(payload: &[u8]) -> Vec<u8> {
        zstd::stream::encode_all(payload, 3).unwrap()
    }

    #[test]
    fn test_decompress_then_reuse() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("data.db.zst");
        let store = dir.path().join("runtime.db");

        let payload = b"0123456789";
        std::fs::write(&snapshot, compress(payload)).unwrap();

        match materialize(&snapshot, &store).unwrap() {
            Materialization::Decompressed { bytes, .. } => assert_eq!(bytes, 10),
            other => panic!("expected Decompressed, got {:?}", other),
        }
        assert_eq!(std::fs::read(&store).unwrap(), payload);

        // Second call must not touch the snapshot: replace it with garbage
        // and the existing store still wins, byte for byte.
        std::fs::write(&snapshot, b"not a zstd stream").unwrap();
        assert!(matches!(
            materialize(&snapshot, &store).unwrap(),
            Materialization::Reused
        ));
        assert_eq!(std::fs::read(&store).unwrap(), payload);
    }

    #[test]
    fn test_existing_store_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("missing.db.zst");
        let store = dir.path().join("runtime.db");
        std::fs::write(&store, b"kept as-is").unwrap();

        assert!(matches!(
            materialize(&snapshot, &store).unwrap(),
            Materialization::Reused
        ));
        assert_eq!(std::fs::read(&store).unwrap(), b"kept as-is");
    }

    #[test]
    fn test_neither_exists_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("missing.db.zst");
        let store = dir.path().join("runtime.db");

        assert!(matches!(
            materialize(&snapshot, &store).unwrap(),
            Materialization::Absent
        ));
        assert!(!store.exists());
    }

    #[test]
    fn test_truncated_snapshot_leaves_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("data.db.zst");
        let store = dir.path().join("runtime.db");

        let compressed = compress(&[0xABu8; 64 * 1024]);
        std::fs::write(&snapshot, &compressed[..compressed.len() / 2]).unwrap();

        let err = materialize(&snapshot, &store).unwrap_err();
        assert!(matches!(err, Error::Decompression(_)));
        assert!(!store.exists());

        // The temp file must be cleaned up too.
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .count();
        assert_eq!(leftovers, 1); // just the snapshot
    }

    #[test]
    fn test_round_trip_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("data.db.zst");
        let store = dir.path().join("runtime.db");

        let payload: Vec<u8> = (0..4096u32).flat_map(|i| i.to_le_bytes()).collect();
        std::fs::write(&snapshot, compress(&payload)).unwrap();

        let checksum = match materialize(&snapshot, &store).unwrap() {
            Materialization::Decompressed { checksum, .. } => checksum,
            other => panic!("expected Decompressed, got {:?}", other),
        };
        assert_eq!(checksum, blake3::hash(&payload));
        assert_eq!(blake3::hash(&std::fs::read(&store).unwrap()), checksum);
    }

    #[test]
    fn test_store_directory_created() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("data.db.zst");
        let store = dir.path().join(".vitrina").join("runtime.db");

        std::fs::write(&snapshot, compress(b"payload")).unwrap();

        assert!(matches!(
            materialize(&snapshot, &store).unwrap(),
            Materialization::Decompressed { .. }
        ));
        assert_eq!(std::fs::read(&store).unwrap(), b"payload");
    }
}

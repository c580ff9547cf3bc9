use crate::Error;
use std::path::PathBuf;
use tracing::warn;

/// Durable storage for the next payment index to wait for.
///
/// A missing or unreadable file reads as index 0; a failed write is an error
/// the caller must not swallow, since losing the advance silently would skip
/// or replay a payment across restarts.
#[derive(Clone, Debug)]
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    /// Create a checkpoint store backed by the given file path
    pub fn new(path: PathBuf) -> CheckpointFile {
        CheckpointFile { path }
    }

    /// Read the checkpointed index, soft-failing to 0
    pub async fn load(&self) -> u64 {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => match contents.trim().parse::<u64>() {
                Ok(index) => index,
                Err(_) => {
                    warn!(
                        "checkpoint file {} is not a number, starting from 0",
                        self.path.display()
                    );
                    0
                }
            },
            Err(_) => 0,
        }
    }

    /// Overwrite the checkpointed index
    pub async fn store(&self, index: u64) -> Result<(), Error> {
        tokio::fs::write(&self.path, index.to_string())
            .await
            .map_err(Error::CheckpointWrite)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointFile::new(dir.path().join("checkpoint"));
        assert_eq!(store.load().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint");
        std::fs::write(&path, "not a number").unwrap();
        let store = CheckpointFile::new(path);
        assert_eq!(store.load().await, 0);
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointFile::new(dir.path().join("checkpoint"));
        store.store(42).await.unwrap();
        assert_eq!(store.load().await, 42);
        store.store(43).await.unwrap();
        assert_eq!(store.load().await, 43);
    }

    #[tokio::test]
    async fn test_store_to_bad_path_errors() {
        let store = CheckpointFile::new(PathBuf::from("/nonexistent-dir/checkpoint"));
        let result = store.store(1).await;
        assert!(matches!(result, Err(Error::CheckpointWrite(_))));
    }
}

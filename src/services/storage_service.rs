//! StorageService — durable payload storage on local disk.
//!
//! Payloads live beneath `base_path/{shard}/{shard}/{key}` where the two
//! shard levels come from the MD5 of the key; that keeps per-directory file
//! counts bounded as uploads accumulate. Metadata is someone else's job
//! (see `media_service`); this module only moves bytes.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{fs, fs::File, io::AsyncWriteExt};
use tracing::debug;
use uuid::Uuid;

const MAX_KEY_LEN: usize = 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object key")]
    InvalidKey,
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Local-disk object store with S3-like semantics:
/// - put: write bytes durably (temp file, fsync, atomic rename)
/// - open: hand back a file handle ready for streaming out
/// - delete: best-effort removal plus empty-directory pruning
#[derive(Clone, Debug)]
pub struct StorageService {
    base_path: PathBuf,
}

impl StorageService {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Basic key validation to avoid trivial path traversal vectors.
    /// Rejects empty keys, keys that begin with `/`, and anything
    /// containing `..`, control bytes, or backslashes.
    fn ensure_key_safe(key: &str) -> StorageResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey);
        }
        if key.starts_with('/') || key.contains("..") {
            return Err(StorageError::InvalidKey);
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return Err(StorageError::InvalidKey);
        }
        Ok(())
    }

    /// Two-level shard identifiers from MD5(key), as lowercase hex bytes.
    fn shards(key: &str) -> (String, String) {
        let digest = md5::compute(key);
        (format!("{:02x}", digest[0]), format!("{:02x}", digest[1]))
    }

    /// Fully-qualified payload path: `base_path/{shard}/{shard}/{key}`.
    /// Parent directories may not exist yet.
    fn object_path(&self, key: &str) -> PathBuf {
        let (shard_a, shard_b) = Self::shards(key);
        let mut path = self.base_path.clone();
        path.push(shard_a);
        path.push(shard_b);
        path.push(key);
        path
    }

    /// Write a payload durably under `key`.
    ///
    /// Bytes go to a temporary file first, are fsynced, then renamed into
    /// the final location so a crash never leaves a half-written payload
    /// addressable. Temp files are cleaned up on every error path.
    pub async fn put_object(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        Self::ensure_key_safe(key)?;

        let file_path = self.object_path(key);
        let parent = file_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StorageError::Io(io::Error::other("object path missing parent")))?;
        fs::create_dir_all(&parent).await?;

        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        let write_result = async {
            file.write_all(data).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;
        if let Err(err) = write_result {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::Io(err));
        }

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&file_path).await?;
                fs::rename(&tmp_path, &file_path).await?;
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StorageError::Io(err));
            }
        }

        Ok(())
    }

    /// Open a payload for reading, ready to stream out.
    pub async fn open_object(&self, key: &str) -> StorageResult<File> {
        Self::ensure_key_safe(key)?;

        let file_path = self.object_path(key);
        File::open(&file_path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::Io(err)
            }
        })
    }

    /// Remove a payload and prune any shard directories it leaves empty.
    ///
    /// An already-missing file is not an error; metadata deletion must
    /// succeed whether or not the payload is still on disk.
    pub async fn delete_object(&self, key: &str) -> StorageResult<()> {
        Self::ensure_key_safe(key)?;

        let file_path = self.object_path(key);
        match fs::remove_file(&file_path).await {
            Ok(_) => debug!("removed payload {}", file_path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("payload {} already missing", file_path.display());
            }
            Err(err) => return Err(StorageError::Io(err)),
        }

        if let Some(parent) = file_path.parent() {
            self.prune_empty_dirs(parent).await;
        }

        Ok(())
    }

    /// Recursively remove empty directories up to (not including) the base
    /// path. Stops at the first non-empty or missing directory.
    async fn prune_empty_dirs(&self, start: &Path) {
        let mut current = start.to_path_buf();
        while current.starts_with(&self.base_path) && current != self.base_path {
            match fs::remove_dir(&current).await {
                Ok(_) => {
                    if let Some(parent) = current.parent() {
                        current = parent.to_path_buf();
                    } else {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::NotFound => break,
                Err(err) if err.kind() == ErrorKind::DirectoryNotEmpty => break,
                Err(err) => {
                    debug!("failed to prune directory {}: {}", current.display(), err);
                    break;
                }
            }
        }
    }
}

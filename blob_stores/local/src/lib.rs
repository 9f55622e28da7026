use anyhow::Context;
use bytes::Bytes;
use hashfs_core::store::{ByteStream, StoreError, StoreResult};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalStoreConfig {
    pub base_path: String,
}

/// Read-only store over a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        LocalStore {
            base_path: base_path.into(),
        }
    }

    pub fn create(config: LocalStoreConfig) -> Self {
        LocalStore {
            base_path: config.base_path.into(),
        }
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    fn resolve_path(&self, path: &str) -> StoreResult<PathBuf> {
        if path.split('/').any(|segment| segment == "..") || path.starts_with('/') {
            return Err(StoreError::InvalidPath(format!(
                "{path}: must be a relative path without '..'"
            )));
        }
        Ok(self.base_path.join(path))
    }

    /// Opens a regular file and returns it with its length.
    ///
    /// Directories report `NotFound`.
    async fn open_file(&self, path: &str) -> StoreResult<(File, u64)> {
        let full_path = self.resolve_path(path)?;
        let file = File::open(&full_path).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            tracing::trace!(path, "localstore: not a regular file");
            return Err(StoreError::NotFound);
        }
        Ok((file, metadata.len()))
    }
}

#[async_trait::async_trait]
impl hashfs_core::store::Store for LocalStore {
    async fn open_read_stream(
        &self,
        path: &str,
        offset: u64,
        max_len: Option<u64>,
    ) -> StoreResult<ByteStream> {
        let (mut file, _len) = self.open_file(path).await?;

        if offset > 0 {
            file.seek(std::io::SeekFrom::Start(offset)).await?;
        }

        let reader: Box<dyn tokio::io::AsyncRead + Send + Unpin> = if let Some(len) = max_len {
            Box::new(file.take(len))
        } else {
            Box::new(file)
        };

        let stream = ReaderStream::new(reader);

        Ok(Box::new(stream))
    }

    async fn open_read_bytes(
        &self,
        path: &str,
        offset: u64,
        max_len: Option<u64>,
    ) -> StoreResult<Bytes> {
        let (mut file, file_len) = self.open_file(path).await?;

        if offset >= file_len {
            return Ok(Bytes::new());
        }

        file.seek(std::io::SeekFrom::Start(offset)).await?;

        let len_to_read = match max_len {
            Some(len) => std::cmp::min(len, file_len - offset),
            None => file_len - offset,
        };

        let capacity =
            usize::try_from(len_to_read).context("file segment too large to read into memory")?;
        let mut buffer = Vec::with_capacity(capacity);

        file.take(len_to_read).read_to_end(&mut buffer).await?;

        Ok(Bytes::from(buffer))
    }
}

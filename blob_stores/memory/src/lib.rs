use bytes::Bytes;
use dashmap::DashMap;
use futures::stream;
use hashfs_core::store::{ByteStream, StoreError, StoreResult};

/// Read-only store over a fixed set of in-memory files.
///
/// Files are added while setting the store up; the `Store` interface
/// itself never writes.
#[derive(Debug)]
pub struct MemoryStore {
    files: DashMap<String, Bytes>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    /// Adds or replaces the file at `path`.
    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Bytes>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Bytes)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Bytes)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl hashfs_core::store::Store for MemoryStore {
    /// Returns a stream that yields the bytes of the object at the given path.
    async fn open_read_stream(
        &self,
        path: &str,
        offset: u64,
        max_len: Option<u64>,
    ) -> StoreResult<ByteStream> {
        let bytes = self.open_read_bytes(path, offset, max_len).await?;
        let future = Box::pin(async { Ok(bytes) });
        let stream = stream::once(future);
        Ok(Box::new(stream))
    }

    /// Returns the bytes of the object at the given path.
    async fn open_read_bytes(
        &self,
        path: &str,
        offset: u64,
        max_len: Option<u64>,
    ) -> StoreResult<Bytes> {
        let file = self.files.get(path).ok_or(StoreError::NotFound)?;
        let file_len = file.len();
        let start = usize::try_from(offset).unwrap_or(usize::MAX);

        if start >= file_len {
            return Ok(Bytes::new());
        }

        let remaining = file_len - start;
        let len = match max_len {
            Some(max) => std::cmp::min(remaining as u64, max) as usize,
            None => remaining,
        };
        let end = start + len;

        Ok(file.slice(start..end))
    }
}

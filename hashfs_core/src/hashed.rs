//! Digest-embedded file names over a read-only [`Store`].
//!
//! [`HashedStore`] wraps a backing store and hands out names such as
//! `css/main.<sha256>.css` for `css/main.css`. Opening such a name resolves
//! it back to the plain path after checking that the embedded digest still
//! matches the file's current bytes.
//!
//! Digests are computed lazily and cached for the lifetime of the adapter.
//! A hashed name that validated once keeps resolving without re-validation,
//! even if the backing file changes afterwards.

use bytes::Bytes;
use futures::TryStreamExt;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::io::StreamReader;

use crate::{
    Digest,
    name::{hashed_path, parse_hashed_path},
    store::{ByteStream, Store, StoreError},
};

#[derive(thiserror::Error, Debug)]
pub enum HashedError {
    /// The requested name does not resolve to a file whose current digest
    /// matches the one it carries.
    #[error("open {path}: file does not exist")]
    NotFound { path: String },
    #[error("open {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: StoreError,
    },
}

impl HashedError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HashedError::NotFound { .. })
    }

    /// The name that was requested from [`HashedStore::open`].
    pub fn path(&self) -> &str {
        match self {
            HashedError::NotFound { path } | HashedError::Store { path, .. } => path,
        }
    }

    fn not_found(path: &str) -> Self {
        HashedError::NotFound {
            path: path.to_string(),
        }
    }
}

/// Both cache indexes, written together.
#[derive(Debug, Default)]
struct NameTable {
    /// plain path -> digest
    by_plain: HashMap<String, Digest>,
    /// hashed path -> plain path
    by_hashed: HashMap<String, String>,
}

impl NameTable {
    fn record(&mut self, plain: &str, hashed: String, digest: Digest) {
        self.by_plain.insert(plain.to_string(), digest);
        self.by_hashed.insert(hashed, plain.to_string());
    }
}

#[derive(Debug)]
struct Inner {
    store: Arc<dyn Store>,
    table: RwLock<NameTable>,
}

/// Content-addressed naming adapter over a read-only [`Store`].
///
/// Cloning is cheap; clones share the same caches.
#[derive(Debug, Clone)]
pub struct HashedStore {
    inner: Arc<Inner>,
}

impl HashedStore {
    pub fn new<S>(store: S) -> Self
    where
        S: Store + 'static,
    {
        Self::from_arc(Arc::new(store))
    }

    pub fn from_arc(store: Arc<dyn Store>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                table: RwLock::new(NameTable::default()),
            }),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.inner.store
    }

    /// Returns the digest of the file at `plain`, reading it on first use.
    ///
    /// `None` when the file cannot be read; the cause is not reported.
    pub async fn digest(&self, plain: &str) -> Option<Digest> {
        if let Some(digest) = self.cached_digest(plain) {
            return Some(digest);
        }
        tracing::trace!(path = plain, "hashedstore: digest cache miss");

        let digest = self.read_digest(plain).await?;
        self.record(plain, hashed_path(plain, &digest.to_hex()), digest);
        Some(digest)
    }

    /// Hex token form of [`HashedStore::digest`].
    pub async fn digest_hex(&self, plain: &str) -> Option<String> {
        self.digest(plain).await.map(|digest| digest.to_hex())
    }

    /// Returns the digest-embedded name for the file at `plain`.
    pub async fn hashed_name(&self, plain: &str) -> Option<String> {
        let digest = self.digest(plain).await?;
        Some(hashed_path(plain, &digest.to_hex()))
    }

    /// Resolves a hashed name to its plain path without opening the file.
    pub async fn resolve(&self, requested: &str) -> Option<String> {
        if let Some(plain) = self.cached_plain(requested) {
            return Some(plain);
        }

        let (plain, token) = parse_hashed_path(requested)?;
        // Cold names are checked against the live bytes, never a cached digest.
        let Some(digest) = self.read_digest(&plain).await else {
            tracing::debug!(path = requested, plain = %plain, "hashedstore: plain file unreadable");
            return None;
        };
        if !digest.matches_hex(token) {
            tracing::debug!(
                path = requested,
                expected = %digest,
                "hashedstore: digest mismatch"
            );
            return None;
        }

        self.record(&plain, requested.to_string(), digest);
        Some(plain)
    }

    /// Opens a file by its hashed name.
    ///
    /// Names seen before are served straight from the cache. Other names
    /// are parsed and the digest they carry is checked against the current
    /// contents of the plain file; a match replaces the cached digest of
    /// that file.
    pub async fn open(&self, requested: &str) -> Result<HashedFile, HashedError> {
        let plain = self
            .resolve(requested)
            .await
            .ok_or_else(|| HashedError::not_found(requested))?;

        let stream = match self.inner.store.open_read_stream(&plain, 0, None).await {
            Ok(stream) => stream,
            Err(err) if err.is_not_found() => return Err(HashedError::not_found(requested)),
            Err(source) => {
                return Err(HashedError::Store {
                    path: requested.to_string(),
                    source,
                });
            }
        };

        Ok(HashedFile {
            name: requested.to_string(),
            plain_path: plain,
            stream,
        })
    }

    /// Cached digest for `plain`, without touching the backing store.
    pub fn cached_digest(&self, plain: &str) -> Option<Digest> {
        self.table().by_plain.get(plain).copied()
    }

    /// Cached plain path for a hashed name, without touching the backing store.
    pub fn cached_plain(&self, hashed: &str) -> Option<String> {
        self.table().by_hashed.get(hashed).cloned()
    }

    /// Number of plain paths with a cached digest.
    pub fn len(&self) -> usize {
        self.table().by_plain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn read_digest(&self, plain: &str) -> Option<Digest> {
        match self.inner.store.open_read_bytes(plain, 0, None).await {
            Ok(bytes) => Some(Digest::new(&bytes)),
            Err(err) => {
                tracing::debug!(path = plain, error = %err, "hashedstore: cannot read file");
                None
            }
        }
    }

    fn table(&self) -> std::sync::RwLockReadGuard<'_, NameTable> {
        // Entries are inserted whole, so a poisoned table is still coherent.
        self.inner
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, plain: &str, hashed: String, digest: Digest) {
        self.inner
            .table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .record(plain, hashed, digest);
    }
}

/// A file opened through [`HashedStore::open`].
pub struct HashedFile {
    name: String,
    plain_path: String,
    stream: ByteStream,
}

impl std::fmt::Debug for HashedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashedFile")
            .field("name", &self.name)
            .field("plain_path", &self.plain_path)
            .finish_non_exhaustive()
    }
}

impl HashedFile {
    /// The hashed name this file was opened by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path of the file in the backing store.
    pub fn plain_path(&self) -> &str {
        &self.plain_path
    }

    pub fn into_stream(self) -> ByteStream {
        self.stream
    }

    pub fn into_reader(self) -> Box<dyn tokio::io::AsyncRead + Send + Unpin> {
        Box::new(StreamReader::new(self.stream))
    }

    /// Reads the remaining content into memory.
    pub async fn read_to_bytes(self) -> std::io::Result<Bytes> {
        let chunks: Vec<Bytes> = self.stream.try_collect().await?;
        Ok(Bytes::from(chunks.concat()))
    }
}

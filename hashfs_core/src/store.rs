use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

/// Boxed byte stream returned by [`Store::open_read_stream`].
pub type ByteStream = Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + Unpin + 'static>;

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("invalid path: '{0}'")]
    InvalidPath(String),
    #[error(transparent)]
    Io(std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound
        } else {
            StoreError::Io(err)
        }
    }
}

/// Read-only, path-keyed byte provider.
///
/// Paths are relative keys separated by `/`. Any path may report
/// [`StoreError::NotFound`] at any time.
#[async_trait]
pub trait Store: std::fmt::Debug + Send + Sync + 'static {
    async fn open_read_stream(
        &self,
        path: &str,
        offset: u64,
        max_len: Option<u64>,
    ) -> StoreResult<ByteStream>;

    async fn open_read_bytes(
        &self,
        path: &str,
        offset: u64,
        max_len: Option<u64>,
    ) -> StoreResult<Bytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err: StoreError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(err.is_not_found());

        let err: StoreError = std::io::Error::from(std::io::ErrorKind::PermissionDenied).into();
        assert!(!err.is_not_found());
        assert!(matches!(err, StoreError::Io(_)));
    }
}

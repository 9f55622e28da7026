//! Test utilities for `Store` implementations.
//!
//! This module provides a test suite that can be run against any read-only
//! `Store` implementation, and against a `HashedStore` layered over it.
//! Stores are read-only, so the suite expects the store under test to be
//! seeded with [`fixtures`] first.
//!
//! # Usage
//!
//! In your store crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! hashfs_core = { workspace = true, features = ["testutil"] }
//! ```
//!
//! In your test file:
//!
//! ```ignore
//! use hashfs_core::testutil::{StoreTests, fixtures};
//!
//! #[tokio::test]
//! async fn test_my_store() {
//!     let store = MyStore::seeded_with(fixtures());
//!     StoreTests::new(&store).run_all().await.unwrap();
//! }
//! ```

use crate::{
    Digest, HashedStore,
    name::hashed_path,
    store::{Store, StoreResult},
};
use bytes::Bytes;
use futures::StreamExt;
use rand::Rng;

/// Prefix under which all fixtures live.
pub const FIXTURE_PREFIX: &str = "_fixtures/";

const BYTES_FILE: &str = "bytes_test.bin";
const STREAM_FILE: &str = "stream_test.bin";
const PARTIAL_FILE: &str = "partial_test.bin";
const NESTED_FILE: &str = "subdir/nested_test.txt";
const NOEXT_FILE: &str = "subdir/noext";

fn path(name: &str) -> String {
    format!("{FIXTURE_PREFIX}{name}")
}

/// Files a store must contain before running [`StoreTests`] or
/// [`HashedStoreTests`].
pub fn fixtures() -> Vec<(String, Bytes)> {
    vec![
        (path(BYTES_FILE), Bytes::from_static(b"hello, world!")),
        (path(STREAM_FILE), Bytes::from(vec![0u8; 1024 * 10])),
        (path(PARTIAL_FILE), Bytes::from_static(b"0123456789abcdef")),
        (path(NESTED_FILE), Bytes::from_static(b"nested\n")),
        (path(NOEXT_FILE), Bytes::from_static(b"no extension\n")),
    ]
}

/// Test suite for read-only `Store` implementations.
///
/// Runs a set of tests to verify that a store implementation behaves
/// correctly according to the `Store` trait contract.
pub struct StoreTests<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> StoreTests<'a, S> {
    /// Create a new test suite for the given store, seeded with [`fixtures`].
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run all tests.
    pub async fn run_all(&self) -> StoreResult<()> {
        self.test_get_bytes().await?;
        self.test_get_stream().await?;
        self.test_partial_read().await?;
        self.test_nested_path().await?;
        self.test_not_found().await?;
        Ok(())
    }

    /// Test full reads as bytes.
    pub async fn test_get_bytes(&self) -> StoreResult<()> {
        let retrieved = self.store.open_read_bytes(&path(BYTES_FILE), 0, None).await?;
        assert_eq!(
            retrieved.as_ref(),
            b"hello, world!",
            "retrieved data should match fixture"
        );
        Ok(())
    }

    /// Test full reads as a stream.
    pub async fn test_get_stream(&self) -> StoreResult<()> {
        let mut stream = self.store.open_read_stream(&path(STREAM_FILE), 0, None).await?;
        let mut retrieved = Vec::new();
        while let Some(chunk) = stream.next().await {
            retrieved.extend_from_slice(&chunk?);
        }

        assert_eq!(retrieved.len(), 1024 * 10, "stream data length should match");
        assert!(retrieved.iter().all(|b| *b == 0), "stream data should match");
        Ok(())
    }

    /// Test partial/range reads.
    pub async fn test_partial_read(&self) -> StoreResult<()> {
        let partial_path = path(PARTIAL_FILE);

        // Read from offset
        let partial = self.store.open_read_bytes(&partial_path, 5, None).await?;
        assert_eq!(partial.as_ref(), b"56789abcdef", "offset read should work");

        // Read with length limit
        let partial = self.store.open_read_bytes(&partial_path, 0, Some(5)).await?;
        assert_eq!(partial.as_ref(), b"01234", "length-limited read should work");

        // Read with offset and length
        let partial = self.store.open_read_bytes(&partial_path, 4, Some(4)).await?;
        assert_eq!(partial.as_ref(), b"4567", "offset + length read should work");

        // Offset past the end
        let partial = self.store.open_read_bytes(&partial_path, 100, None).await?;
        assert!(partial.is_empty(), "read past the end should be empty");

        Ok(())
    }

    /// Test reads below a nested directory.
    pub async fn test_nested_path(&self) -> StoreResult<()> {
        let retrieved = self.store.open_read_bytes(&path(NESTED_FILE), 0, None).await?;
        assert_eq!(retrieved.as_ref(), b"nested\n", "nested read should work");
        Ok(())
    }

    /// Test that missing files report `NotFound`.
    pub async fn test_not_found(&self) -> StoreResult<()> {
        let missing = path("missing.bin");

        let err = self
            .store
            .open_read_bytes(&missing, 0, None)
            .await
            .expect_err("reading a missing file should fail");
        assert!(err.is_not_found(), "expected NotFound, got {err}");

        let err = self
            .store
            .open_read_stream(&missing, 0, None)
            .await
            .err()
            .expect("streaming a missing file should fail");
        assert!(err.is_not_found(), "expected NotFound, got {err}");

        Ok(())
    }
}

/// Test suite for a `HashedStore` over a store seeded with [`fixtures`].
pub struct HashedStoreTests<'a> {
    hashed: &'a HashedStore,
}

impl<'a> HashedStoreTests<'a> {
    pub fn new(hashed: &'a HashedStore) -> Self {
        Self { hashed }
    }

    /// Run all tests.
    pub async fn run_all(&self) {
        self.test_hashed_names().await;
        self.test_open_hashed_names().await;
        self.test_reject_plain_names().await;
        self.test_reject_tampered_names().await;
        self.test_reject_missing_files().await;
    }

    /// Every fixture gets a name carrying the digest of its content.
    pub async fn test_hashed_names(&self) {
        for (plain, content) in fixtures() {
            let digest = Digest::new(&content);
            assert_eq!(self.hashed.digest(&plain).await, Some(digest), "{plain}");
            assert_eq!(
                self.hashed.hashed_name(&plain).await,
                Some(hashed_path(&plain, &digest.to_hex())),
                "{plain}"
            );
        }
    }

    /// Hashed names open to the fixture content.
    pub async fn test_open_hashed_names(&self) {
        for (plain, content) in fixtures() {
            let name = hashed_path(&plain, &Digest::new(&content).to_hex());
            let file = self
                .hashed
                .open(&name)
                .await
                .unwrap_or_else(|err| panic!("open {name}: {err}"));
            assert_eq!(file.plain_path(), plain);
            let read = file.read_to_bytes().await.expect("read hashed file");
            crate::assert_bytes_eq!(read, content, "content of {name}");
        }
    }

    /// Plain names carry no digest and never open.
    pub async fn test_reject_plain_names(&self) {
        for (plain, _) in fixtures() {
            let err = self
                .hashed
                .open(&plain)
                .await
                .expect_err("plain name should not open");
            assert!(err.is_not_found(), "{plain}: {err}");
        }
    }

    /// Names whose digest does not match the current content never open.
    pub async fn test_reject_tampered_names(&self) {
        let wrong = "8".repeat(Digest::HEX_LEN);
        for (plain, _) in fixtures() {
            let name = hashed_path(&plain, &wrong);
            let err = self
                .hashed
                .open(&name)
                .await
                .expect_err("tampered name should not open");
            assert!(err.is_not_found(), "{name}: {err}");
        }
    }

    /// Names pointing at files that do not exist never open.
    pub async fn test_reject_missing_files(&self) {
        let name = hashed_path(&path("missing.bin"), &Digest::EMPTY.to_hex());
        assert_eq!(self.hashed.digest(&path("missing.bin")).await, None);
        let err = self
            .hashed
            .open(&name)
            .await
            .expect_err("missing file should not open");
        assert!(err.is_not_found(), "{name}: {err}");
    }
}

/// Generate random bytes for testing.
pub fn random_bytes(len: usize) -> Bytes {
    let mut data = vec![0u8; len];
    rand::rng().fill(&mut data[..]);
    Bytes::from(data)
}

/// Assert that two byte slices are equal with a descriptive message.
#[macro_export]
macro_rules! assert_bytes_eq {
    ($left:expr, $right:expr) => {
        assert_eq!(
            $left.as_ref() as &[u8],
            $right.as_ref() as &[u8],
            "byte content mismatch"
        );
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        assert_eq!(
            $left.as_ref() as &[u8],
            $right.as_ref() as &[u8],
            $($arg)+
        );
    };
}

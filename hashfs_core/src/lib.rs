//! Content-addressed file names over read-only stores.
//!
//! [`HashedStore`] wraps any [`Store`] and gives every file a second name
//! with the SHA-256 digest of its contents embedded, e.g. `app.js` becomes
//! `app.<digest>.js`. Such names can be cached forever by browsers and
//! proxies: when the content changes, so does the name.
//!
//! ```ignore
//! let hashed = HashedStore::new(MemoryStore::from_iter([("app.js".into(), bytes)]));
//! let name = hashed.hashed_name("app.js").await.expect("app.js exists");
//! let file = hashed.open(&name).await?;
//! ```
//!
//! ## Modules
//!
//! - [`store`]: the read-only backing store trait and its errors
//! - [`digest`]: the content digest type
//! - [`name`]: hashed file name layout
//! - [`hashed`]: the caching adapter

pub mod digest;
pub mod hashed;
pub mod name;
pub mod store;

// Test utilities (behind feature flag)
#[cfg(feature = "testutil")]
pub mod testutil;

pub use digest::Digest;
pub use hashed::{HashedError, HashedFile, HashedStore};
pub use store::{ByteStream, Store, StoreError, StoreResult};

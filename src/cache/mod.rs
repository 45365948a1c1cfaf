//! Cache module for storing provider responses to disk
//!
//! Responses are cached per provider in a single JSON file, keyed by a
//! deterministic fingerprint of the request. A cached response is reused
//! forever; only a miss reaches the network.

mod key;
mod store;

pub use key::{fingerprint, RequestParams, KEY_MARKER};
pub use store::{CacheEntries, CacheStore};

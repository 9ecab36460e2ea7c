//! Cache behaviour against in-memory collections.
//!
//! - `support.rs`       - fake remote collections with gated responses
//! - `resource_cache.rs` - load states, mutations, races and cancellation
//! - `reports_cache.rs`  - dashboard loading

pub(crate) mod support;

//! HTTP-level tests against an in-process mock API.
//!
//! - `harness.rs`         - mock server serving canned responses
//! - `resource_client.rs` - list/create/update/remove outcomes
//! - `auth.rs`            - login and registration exchanges
//! - `lookups.rs`         - lookup tables fetched over HTTP

mod auth;

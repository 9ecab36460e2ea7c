//! HTTP access to the EcoDelicias REST API.
//!
//! - [`ApiClient`]: shared `reqwest` client plus the API base URL
//! - [`ResourceClient`]: list/create/update/remove against one collection
//! - [`LookupClient`] / [`LookupTable`]: read-only reference data
//! - [`Authenticator`] / [`Registrar`]: login and sign-up exchanges
//!
//! Requests carry no authorization credential. Role checks done by callers
//! are a usability aid only; the server has to enforce access on its own.

mod auth;
mod client;
mod error;
mod lookups;
mod resource_client;

#[cfg(test)]
mod tests;

pub use auth::{Authenticator, Registrar};
pub use client::ApiClient;
pub use error::{AuthError, AuthResult, ClientError, ClientResult, WriteOperation};
pub use lookups::{LookupApi, LookupClient, LookupTable, MISSING_LABEL};
pub use resource_client::{ResourceApi, ResourceClient};

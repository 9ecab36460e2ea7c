//! Session store for the EcoDelicias client.
//!
//! Records the identity returned by the authenticator, persists it in a
//! single local-storage slot and rehydrates it on startup. It performs no
//! network calls of its own.

mod error;
mod store;

pub use error::{SessionError, SessionResult};
pub use store::{SessionEvent, SessionStore};

pub use eco_types::{Session, UserRole};

//! Storage key constants.

/// Fixed slot names used by the client.
pub struct StorageKeys;

impl StorageKeys {
    /// Serialized session (`{id, email, userType}`)
    pub const USER: &'static str = "user";

    /// Every key the client writes.
    pub const ALL: &'static [&'static str] = &[Self::USER];
}

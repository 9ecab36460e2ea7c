use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Server-assigned identity of a record, unique within its collection.
pub type ResourceId = i64;

/// A record living in a remote CRUD collection.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Payload sent on create: the record without its identity.
    type Draft: Clone + Send + Sync + Serialize + 'static;

    /// Collection name; the endpoint is `{base}/Controller{COLLECTION}`.
    const COLLECTION: &'static str;

    /// Plural, human-readable name used in user-facing messages.
    const LABEL: &'static str;

    fn id(&self) -> ResourceId;

    /// Title used by search projections.
    fn title(&self) -> &str;
}

/// Caller-side creation timestamp in the format the API stores
/// (`2025-03-01T12:00:00.000Z`).
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_timestamp_uses_millis_and_z() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(iso_timestamp(now), "2025-03-01T12:00:00.000Z");
    }
}

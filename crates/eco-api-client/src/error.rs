//! Error types for the API client.

use eco_types::ValidationIssue;
use std::fmt;
use thiserror::Error;

/// Which mutation a [`ClientError::WriteFailed`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            WriteOperation::Create => "create",
            WriteOperation::Update => "update",
            WriteOperation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Outcome of a failed collection call.
///
/// Transport, status and decoding failures are all folded into these
/// variants; nothing from `reqwest` or `serde_json` leaks past the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The collection could not be listed right now. Not the same as empty.
    #[error("Could not load {collection}: {reason}")]
    FetchFailed {
        collection: &'static str,
        reason: String,
    },

    /// A create, update or delete was rejected or never reached the server.
    #[error("Could not {operation} {collection}: {reason}")]
    WriteFailed {
        collection: &'static str,
        operation: WriteOperation,
        reason: String,
    },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl ClientError {
    pub(crate) fn fetch(collection: &'static str, reason: impl ToString) -> Self {
        ClientError::FetchFailed {
            collection,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(
        collection: &'static str,
        operation: WriteOperation,
        reason: impl ToString,
    ) -> Self {
        ClientError::WriteFailed {
            collection,
            operation,
            reason: reason.to_string(),
        }
    }
}

impl ClientError {
    /// Short message for display, without transport details.
    pub fn summary(&self) -> String {
        match self {
            ClientError::FetchFailed { collection, .. } => format!("Could not load {}", collection),
            ClientError::WriteFailed {
                collection,
                operation,
                ..
            } => format!("Could not {} {}", operation, collection),
            ClientError::InvalidUrl(_) | ClientError::Setup(_) => self.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from the login and registration exchanges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The form failed local validation; nothing was sent.
    #[error("Invalid form: {}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Login rejected, or the server could not be reached.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration rejected by the server.
    #[error("Registration failed: {0}")]
    Rejected(String),

    #[error("Could not reach the server: {0}")]
    Transport(String),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failed_message_names_operation() {
        let err = ClientError::write("recipes", WriteOperation::Delete, "HTTP 500");
        assert_eq!(err.to_string(), "Could not delete recipes: HTTP 500");
        assert_eq!(err.summary(), "Could not delete recipes");
    }

    #[test]
    fn validation_message_lists_issues() {
        let err = AuthError::Validation(vec![
            ValidationIssue::new("email", "Invalid email"),
            ValidationIssue::new("terms", "You must accept the terms and conditions"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid form: email: Invalid email; terms: You must accept the terms and conditions"
        );
    }
}

//! Authenticated identity held by the session store.

use serde::{Deserialize, Serialize};

/// The locally recorded identity of the logged-in user.
///
/// Serialized as `{"id": 7, "email": "...", "userType": 1}`; `id` may be
/// absent. `email` and `userType` are required, so a slot missing either one
/// does not decode and counts as "logged out".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    /// Role as a numeric user type (see [`UserRole`]).
    pub user_type: i64,
}

/// Role derived from the numeric user type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    /// user type 1
    Admin,
    /// user type 5: may manage recipes
    Chef,
    Member(i64),
}

impl From<i64> for UserRole {
    fn from(user_type: i64) -> Self {
        match user_type {
            1 => UserRole::Admin,
            5 => UserRole::Chef,
            other => UserRole::Member(other),
        }
    }
}

impl Session {
    pub fn new(id: Option<i64>, email: impl Into<String>, user_type: i64) -> Self {
        Self {
            id,
            email: email.into(),
            user_type,
        }
    }

    pub fn role(&self) -> UserRole {
        UserRole::from(self.user_type)
    }

    // The checks below only drive what the UI offers; the API does not
    // receive any credential and must enforce authorization itself.

    pub fn can_manage_recipes(&self) -> bool {
        matches!(self.role(), UserRole::Admin | UserRole::Chef)
    }

    pub fn can_manage_blogs(&self) -> bool {
        self.role() == UserRole::Admin
    }

    pub fn can_view_reports(&self) -> bool {
        self.role() == UserRole::Admin
    }
}

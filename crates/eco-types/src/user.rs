//! User-related payloads: login exchange, registration, report rows.

use serde::{Deserialize, Serialize};

/// A user row as far as reports need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub country_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: i64,
    pub email: String,
    pub user_type_id: i64,
}

/// Registration payload posted to the User collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub names: String,
    #[serde(rename = "lastnames")]
    pub last_names: String,
    pub email: String,
    pub phone: i64,
    pub gender_id: i64,
    pub country_id: i64,
    pub user_type_id: i64,
    pub password: String,
    pub creation_date: String,
}

//! Client-side form validation.
//!
//! Every rule is checked; callers get the full list of violations rather
//! than the first one.

use crate::resource::iso_timestamp;
use crate::user::{LoginRequest, NewUser};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

pub type ValidationResult = Result<(), Vec<ValidationIssue>>;

impl ValidationIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn into_result(issues: Vec<ValidationIssue>) -> ValidationResult {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub(crate) fn require(
    issues: &mut Vec<ValidationIssue>,
    field: &'static str,
    value: &str,
    message: &str,
) {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::new(field, message));
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

fn check_email(issues: &mut Vec<ValidationIssue>, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        issues.push(ValidationIssue::new("email", "Email is required"));
    } else if !email_pattern().is_match(email) {
        issues.push(ValidationIssue::new("email", "Invalid email"));
    }
}

fn check_password(issues: &mut Vec<ValidationIssue>, password: &str) {
    if password.chars().count() < 8 {
        issues.push(ValidationIssue::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        issues.push(ValidationIssue::new(
            "password",
            "Password must contain an uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        issues.push(ValidationIssue::new(
            "password",
            "Password must contain a lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push(ValidationIssue::new("password", "Password must contain a digit"));
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        issues.push(ValidationIssue::new(
            "password",
            "Password must contain a special character",
        ));
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut issues = Vec::new();
        check_email(&mut issues, &self.email);
        check_password(&mut issues, &self.password);
        ValidationIssue::into_result(issues)
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub names: String,
    pub last_names: String,
    pub gender_id: Option<i64>,
    pub country_id: Option<i64>,
    pub user_type_id: Option<i64>,
    pub identification_type: String,
    pub identification_number: String,
    pub birth_date: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub contact: String,
    pub accepted_terms: bool,
}

impl RegistrationForm {
    pub fn validate(&self) -> ValidationResult {
        let mut issues = Vec::new();
        require(&mut issues, "names", &self.names, "Please enter your names");
        require(
            &mut issues,
            "last_names",
            &self.last_names,
            "Please enter your last names",
        );
        if self.gender_id.is_none() {
            issues.push(ValidationIssue::new("gender", "Please select your gender"));
        }
        if self.country_id.is_none() {
            issues.push(ValidationIssue::new("country", "Please select your country"));
        }
        require(
            &mut issues,
            "identification_type",
            &self.identification_type,
            "Select your identification type",
        );
        require(
            &mut issues,
            "identification_number",
            &self.identification_number,
            "Please enter your identification number",
        );
        if self.user_type_id.is_none() {
            issues.push(ValidationIssue::new("user_type", "Select your user type"));
        }
        require(
            &mut issues,
            "birth_date",
            &self.birth_date,
            "Please enter your birth date",
        );
        check_email(&mut issues, &self.email);
        check_password(&mut issues, &self.password);
        if self.password != self.confirm_password {
            issues.push(ValidationIssue::new(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        if self.contact.trim().is_empty() {
            issues.push(ValidationIssue::new(
                "contact",
                "Please enter your contact number",
            ));
        } else if self.phone().is_none() {
            issues.push(ValidationIssue::new(
                "contact",
                "Contact must be a phone number",
            ));
        }
        if !self.accepted_terms {
            issues.push(ValidationIssue::new(
                "terms",
                "You must accept the terms and conditions",
            ));
        }
        ValidationIssue::into_result(issues)
    }

    fn phone(&self) -> Option<i64> {
        self.contact.trim().parse::<i64>().ok()
    }

    /// Validate and build the registration payload, stamped with `now`.
    pub fn to_new_user(&self, now: DateTime<Utc>) -> Result<NewUser, Vec<ValidationIssue>> {
        self.validate()?;
        // validate() guarantees every option below is populated
        let (Some(gender_id), Some(country_id), Some(user_type_id), Some(phone)) =
            (self.gender_id, self.country_id, self.user_type_id, self.phone())
        else {
            return Err(vec![ValidationIssue::new("form", "Incomplete registration")]);
        };

        Ok(NewUser {
            names: self.names.trim().to_string(),
            last_names: self.last_names.trim().to_string(),
            email: self.email.trim().to_string(),
            phone,
            gender_id,
            country_id,
            user_type_id,
            password: self.password.clone(),
            creation_date: iso_timestamp(now),
        })
    }
}

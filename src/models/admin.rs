use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use validator::Validate;

static CONTACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());
static CNIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}-?[0-9]{7}-?[0-9]$").unwrap());

/// Staff record with hostel-management privileges. Never carries the
/// password; that lives on the linked [`User`](crate::models::user::User).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Admin {
    pub id: Option<i64>,
    pub name: String,
    pub father_name: String,
    pub contact: String,
    pub address: String,
    pub dob: String,
    pub cnic: String,
    pub email: String,
    #[serde(rename = "user")]
    pub user_id: i64,
    #[serde(rename = "hostel")]
    pub hostel_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Admin {
    pub fn new(profile: AdminProfile, user_id: i64, hostel_id: i64) -> Self {
        Self {
            id: None,
            name: profile.name,
            father_name: profile.father_name,
            contact: profile.contact,
            address: profile.address,
            dob: profile.dob,
            cnic: profile.cnic,
            email: profile.email,
            user_id,
            hostel_id,
            created_at: None,
        }
    }

    /// Overwrites every mutable field with the submitted profile.
    pub fn apply(&mut self, profile: AdminProfile) {
        self.name = profile.name;
        self.email = profile.email;
        self.father_name = profile.father_name;
        self.contact = profile.contact;
        self.address = profile.address;
        self.dob = profile.dob;
        self.cnic = profile.cnic;
    }
}

/// The personal fields shared by registration and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminProfile {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Father name is required"))]
    pub father_name: String,
    #[validate(regex(path = *CONTACT_RE, message = "Contact must be 10-15 digits"))]
    pub contact: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Date of birth is required"))]
    pub dob: String,
    #[validate(regex(path = *CNIC_RE, message = "Enter a valid CNIC"))]
    pub cnic: String,
}

// Every field defaults so a missing key reaches the "All fields are required"
// check instead of failing JSON extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterAdminRequest {
    pub name: String,
    pub email: String,
    pub father_name: String,
    pub contact: String,
    pub address: String,
    pub dob: String,
    pub cnic: String,
    pub hostel: String,
    pub password: String,
}

impl RegisterAdminRequest {
    pub fn has_all_fields(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.father_name,
            &self.contact,
            &self.address,
            &self.dob,
            &self.cnic,
            &self.hostel,
            &self.password,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Splits the request into the admin profile, hostel name and password.
    pub fn into_parts(self) -> (AdminProfile, String, String) {
        (
            AdminProfile {
                name: self.name,
                email: self.email,
                father_name: self.father_name,
                contact: self.contact,
                address: self.address,
                dob: self.dob,
                cnic: self.cnic,
            },
            self.hostel,
            self.password,
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminIdRequest {
    #[validate(range(min = 1, message = "Invalid admin id"))]
    pub id: i64,
}

// Loosely typed so that any falsy `isAdmin` ends in a 401 rather than a
// body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct GetAdminRequest {
    #[serde(rename = "isAdmin", default)]
    pub is_admin: Option<Value>,
    #[serde(default)]
    pub token: Option<Value>,
}

impl GetAdminRequest {
    pub fn is_admin(&self) -> bool {
        self.is_admin.as_ref().is_some_and(is_truthy)
    }

    /// The body token, if it is a non-empty string.
    pub fn token(&self) -> Option<String> {
        self.token
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

// null, false, 0, NaN and "" are falsy; everything else is truthy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminEmailRequest {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
}

use serde::Serialize;

use crate::models::{admin::Admin, hostel::Hostel};

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl ValidationResponse {
    pub fn new(param: Option<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param,
        }
    }
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub token: String,
    pub admin: Admin,
}

#[derive(Serialize)]
pub struct AdminResponse {
    pub success: bool,
    pub admin: Admin,
}

#[derive(Serialize)]
pub struct HostelResponse {
    pub success: bool,
    pub hostel: Option<Hostel>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub msg: String,
}

use crate::models::response::ValidationResponse;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum AdminError {
    ValidationError(Vec<ValidationResponse>),
    Conflict(String),
    NotFound(String),
    Unauthorized(String),
    DatabaseError(String),
    HashingError(String),
    TokenError(String),
    InternalError(String),
}

impl AdminError {
    /// Single-message validation failure, e.g. "All fields are required".
    pub fn invalid(msg: impl Into<String>) -> Self {
        AdminError::ValidationError(vec![ValidationResponse::new(None, msg)])
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AdminError::ValidationError(errors) => {
                let joined = errors
                    .iter()
                    .map(|e| match &e.param {
                        Some(field) => format!("{}: {}", field, e.msg),
                        None => e.msg.clone(),
                    })
                    .collect::<Vec<String>>()
                    .join("; ");
                write!(f, "Validation error: {}", joined)
            }
            AdminError::Conflict(msg) => write!(f, "Conflict error: {}", msg),
            AdminError::NotFound(msg) => write!(f, "Not found error: {}", msg),
            AdminError::Unauthorized(msg) => write!(f, "Unauthorized error: {}", msg),
            AdminError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AdminError::HashingError(msg) => write!(f, "Hashing error: {}", msg),
            AdminError::TokenError(msg) => write!(f, "Token error: {}", msg),
            AdminError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AdminError {}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub errors: Vec<ValidationResponse>,
}

impl ErrorResponse {
    fn single(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            errors: vec![ValidationResponse::new(None, message)],
        }
    }
}

impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut responses: Vec<ValidationResponse> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                let field = field.to_string();
                field_errors.iter().map(move |e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                    ValidationResponse::new(Some(field.clone()), msg)
                })
            })
            .collect();
        // field_errors() is a HashMap; keep the response stable
        responses.sort_by(|a, b| a.param.cmp(&b.param));
        AdminError::ValidationError(responses)
    }
}

impl From<rusqlite::Error> for AdminError {
    fn from(err: rusqlite::Error) -> Self {
        AdminError::DatabaseError(err.to_string())
    }
}

impl ResponseError for AdminError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AdminError::ValidationError(errors) => ErrorResponse {
                success: false,
                message: errors
                    .first()
                    .map(|e| e.msg.clone())
                    .unwrap_or_else(|| "Invalid request".to_string()),
                errors: errors.clone(),
            },
            AdminError::Conflict(msg)
            | AdminError::NotFound(msg)
            | AdminError::Unauthorized(msg) => ErrorResponse::single(msg),
            AdminError::DatabaseError(_)
            | AdminError::HashingError(_)
            | AdminError::TokenError(_)
            | AdminError::InternalError(_) => {
                error!("{}", self);
                ErrorResponse::single(self.public_message())
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AdminError::Conflict(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::BAD_REQUEST,
            AdminError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AdminError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AdminError {
    // Creation failures keep their own wording, everything else is opaque.
    fn public_message(&self) -> &str {
        match self {
            AdminError::InternalError(msg)
                if msg == "User not created" || msg == "Admin not created" =>
            {
                msg.as_str()
            }
            _ => "Server error",
        }
    }
}

use crate::errors::AdminError;
use bcrypt::{hash, BcryptError};

// Hashes a password using bcrypt at the configured cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

impl From<BcryptError> for AdminError {
    fn from(err: BcryptError) -> Self {
        AdminError::HashingError(format!("bcrypt error: {}", err))
    }
}

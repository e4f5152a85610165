use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::AdminError;

/// Claims carried by every admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub iat: u64,
    pub exp: u64,
}

pub struct TokenService {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        let secret = secret.as_bytes();
        Self {
            header: Header::default(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_secs,
        }
    }

    pub fn generate_token(&self, user_id: i64, is_admin: bool) -> Result<String, AdminError> {
        let now = u64::try_from(Utc::now().timestamp())
            .map_err(|e| AdminError::TokenError(e.to_string()))?;
        let claims = Claims {
            user_id,
            is_admin,
            iat: now,
            exp: now + self.expiry_secs,
        };
        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AdminError::TokenError(e.to_string()))
    }

    /// `None` for any token that is malformed, forged or expired.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!("Rejected token: {}", e);
                None
            }
        }
    }
}

use crate::error::MoimError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: usize,
}

#[derive(Clone)]
pub struct JwtService {
    secret: String,
    ttl_secs: usize,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        JwtService {
            secret,
            ttl_secs: 3600,
        }
    }

    pub fn generate_token(&self, user_id: &str) -> Result<String, MoimError> {
        let expiration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as usize + self.ttl_secs)
            .map_err(|e| MoimError::InternalServerError(format!("Time error: {}", e)))?;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| MoimError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, MoimError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| MoimError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}

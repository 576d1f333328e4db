use crate::core::errors::NexusError;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims carried by tokens the auth service issues.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // User ID
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

/// Verifies bearer tokens. Issuing them is the auth service's job.
pub struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        JwtService {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, NexusError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| NexusError::Unauthorized(format!("Invalid token: {}", e)))?;
        if token_data.claims.sub.trim().is_empty() {
            return Err(NexusError::Unauthorized("Token has no subject".to_string()));
        }
        Ok(token_data.claims)
    }
}

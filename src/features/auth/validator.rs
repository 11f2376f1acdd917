use super::jwks::{JwksClient, JwksError};
use super::model::VerifiedToken;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Where token signatures are checked against
pub enum KeySource {
    /// Provider JWKS document (RS256 / ES256)
    Jwks(Arc<JwksClient>),
    /// Shared project secret (HS256)
    Secret(DecodingKey),
}

pub struct JwtValidator {
    keys: KeySource,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(keys: KeySource, issuer: String, audience: String, leeway: Duration) -> Self {
        Self {
            keys,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub fn with_secret(secret: &str, issuer: String, audience: String, leeway: Duration) -> Self {
        Self::new(
            KeySource::Secret(DecodingKey::from_secret(secret.as_bytes())),
            issuer,
            audience,
            leeway,
        )
    }

    pub async fn validate_token(&self, token: &str) -> Result<VerifiedToken, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        let (decoding_key, algorithm) = match &self.keys {
            KeySource::Secret(key) => (key.clone(), Algorithm::HS256),
            KeySource::Jwks(client) => {
                let kid = header
                    .kid
                    .as_deref()
                    .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;
                client.get_key(kid).await.map_err(|e| match e {
                    JwksError::FetchError(_) | JwksError::ParseError(_) => {
                        AppError::ExternalServiceError(e.to_string())
                    }
                    _ => AppError::Auth(e.to_string()),
                })?
            }
        };

        if header.alg != algorithm {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Expected {:?}",
                header.alg, algorithm
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Token subject is not a user id".to_string()))?;

        Ok(VerifiedToken {
            user_id,
            email: claims.email,
        })
    }
}

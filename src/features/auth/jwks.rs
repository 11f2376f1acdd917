use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(default)]
    crv: Option<String>,
    // RSA
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
    // EC
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

impl Jwk {
    /// Decoding key and the only algorithm accepted for it. Unsupported key types yield None.
    fn to_key(&self) -> Result<Option<(DecodingKey, Algorithm)>, JwksError> {
        match self.kty.as_str() {
            "RSA" => {
                let (Some(n), Some(e)) = (&self.n, &self.e) else {
                    return Err(JwksError::KeyConversionError(format!(
                        "RSA key {} is missing modulus or exponent",
                        self.kid
                    )));
                };
                let key = DecodingKey::from_rsa_components(n, e)
                    .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
                Ok(Some((key, Algorithm::RS256)))
            }
            "EC" if self.crv.as_deref() == Some("P-256") => {
                let (Some(x), Some(y)) = (&self.x, &self.y) else {
                    return Err(JwksError::KeyConversionError(format!(
                        "EC key {} is missing coordinates",
                        self.kid
                    )));
                };
                let key = DecodingKey::from_ec_components(x, y)
                    .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
                Ok(Some((key, Algorithm::ES256)))
            }
            _ => Ok(None),
        }
    }
}

struct JwksCache {
    keys: HashMap<String, (DecodingKey, Algorithm)>,
    last_fetched: Instant,
}

/// Fetches and caches the identity provider's signing keys
pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<JwksCache>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(issuer_url: &str, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url(issuer_url),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<(DecodingKey, Algorithm), JwksError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.last_fetched.elapsed() < self.cache_ttl {
                    if let Some(key) = cached.keys.get(kid) {
                        return Ok(key.clone());
                    }
                }
            }
        }

        // Cache miss or expired (also covers key rotation)
        self.fetch_jwks().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn fetch_jwks(&self) -> Result<(), JwksError> {
        tracing::debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            match jwk.to_key() {
                Ok(Some(key)) => {
                    keys.insert(jwk.kid, key);
                }
                Ok(None) => tracing::debug!("Skipping unsupported JWK {} ({})", jwk.kid, jwk.kty),
                Err(e) => tracing::warn!("Skipping unusable JWK {}: {}", jwk.kid, e),
            }
        }

        let mut cache = self.cache.write().await;
        *cache = Some(JwksCache {
            keys,
            last_fetched: Instant::now(),
        });

        Ok(())
    }
}

fn jwks_url(issuer_url: &str) -> String {
    format!("{}/.well-known/jwks.json", issuer_url.trim_end_matches('/'))
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to convert key: {0}")]
    KeyConversionError(String),
}

//! RSA-PSS request signing for the Kalshi API.
//!
//! Signature: `base64(RSA-PSS-SHA256(timestamp_ms + METHOD + path))`, where
//! `path` is the full URL path without query parameters.

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::{BlindedSigningKey, Signature};
use rsa::sha2::Sha256;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;

use crate::error::{ConfigError, ExecutionError, Result};

const PEM_MARKER: &str = "-----BEGIN";

/// API key id plus the parsed signing key.
#[derive(Clone)]
pub struct KalshiAuth {
    api_key: String,
    signing_key: BlindedSigningKey<Sha256>,
}

impl std::fmt::Debug for KalshiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiAuth")
            .field("api_key", &self.api_key)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl KalshiAuth {
    /// Create from an API key id and PEM text (PKCS#1 or PKCS#8).
    ///
    /// Escaped `\n` sequences, as commonly found in `.env` files, are
    /// accepted in place of real newlines.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the key cannot be parsed.
    pub fn new(api_key: &str, pem: &str) -> Result<Self> {
        let pem = pem.replace("\\n", "\n");
        let pem = pem.trim();

        let private_key = RsaPrivateKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
            .map_err(|e| ConfigError::InvalidValue {
                field: "KALSHI_API_SECRET",
                reason: format!("failed to parse RSA private key: {e}"),
            })?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            signing_key: BlindedSigningKey::<Sha256>::new(private_key),
        })
    }

    /// Create from the `KALSHI_API_SECRET` value, which is either PEM text
    /// or a path to a PEM file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the key is invalid.
    pub fn from_secret(api_key: &str, secret: &str) -> Result<Self> {
        if secret.contains(PEM_MARKER) {
            return Self::new(api_key, secret);
        }
        let pem = std::fs::read_to_string(secret.trim()).map_err(ConfigError::ReadFile)?;
        Self::new(api_key, &pem)
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request, returning `(timestamp_ms, base64_signature)`.
    #[must_use]
    pub fn sign_request(&self, method: &str, path: &str) -> (String, String) {
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let signature = self.sign_at(&timestamp, method, path);
        (timestamp, signature)
    }

    fn sign_at(&self, timestamp: &str, method: &str, path: &str) -> String {
        let path = path.split('?').next().unwrap_or(path);
        let message = format!("{timestamp}{method}{path}");
        let signature: Signature = self
            .signing_key
            .sign_with_rng(&mut rand::thread_rng(), message.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(signature.to_bytes())
    }

    /// Build the three `KALSHI-ACCESS-*` headers for one request.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::AuthFailed`] if a value is not a valid header.
    pub fn headers(&self, method: &str, path: &str) -> Result<HeaderMap> {
        let (timestamp, signature) = self.sign_request(method, path);

        let value = |v: &str| {
            HeaderValue::from_str(v).map_err(|e| ExecutionError::AuthFailed(e.to_string()))
        };

        let mut headers = HeaderMap::new();
        headers.insert("KALSHI-ACCESS-KEY", value(&self.api_key)?);
        headers.insert("KALSHI-ACCESS-TIMESTAMP", value(&timestamp)?);
        headers.insert("KALSHI-ACCESS-SIGNATURE", value(&signature)?);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
    use rsa::pss::VerifyingKey;
    use rsa::signature::Verifier;

    fn key() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap()
    }

    fn pem(key: &RsaPrivateKey) -> String {
        key.to_pkcs1_pem(LineEnding::LF).unwrap().to_string()
    }

    #[test]
    fn signature_verifies_over_path_without_query() {
        let private_key = key();
        let auth = KalshiAuth::new("key-id", &pem(&private_key)).unwrap();

        let sig = auth.sign_at("1700000000000", "POST", "/trade-api/v2/portfolio/orders?x=1");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&sig)
            .unwrap();
        assert_eq!(bytes.len(), 256);

        let verifying = VerifyingKey::<Sha256>::new(private_key.to_public_key());
        let signature = Signature::try_from(bytes.as_slice()).unwrap();
        verifying
            .verify(b"1700000000000POST/trade-api/v2/portfolio/orders", &signature)
            .unwrap();
    }

    #[test]
    fn accepts_escaped_newlines() {
        let escaped = pem(&key()).replace('\n', "\\n");
        assert!(KalshiAuth::new("key-id", &escaped).is_ok());
    }

    #[test]
    fn secret_can_be_a_file_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), pem(&key())).unwrap();

        let auth = KalshiAuth::from_secret("key-id", file.path().to_str().unwrap()).unwrap();
        assert_eq!(auth.api_key(), "key-id");
    }

    #[test]
    fn rejects_garbage_key() {
        assert!(KalshiAuth::new("key-id", "-----BEGIN nope-----").is_err());
        assert!(KalshiAuth::from_secret("key-id", "/nonexistent/kalshi.pem").is_err());
    }

    #[test]
    fn headers_are_populated() {
        let auth = KalshiAuth::new("key-id", &pem(&key())).unwrap();
        let headers = auth.headers("GET", "/trade-api/v2/markets").unwrap();

        assert_eq!(headers["KALSHI-ACCESS-KEY"], "key-id");
        assert!(headers["KALSHI-ACCESS-TIMESTAMP"]
            .to_str()
            .unwrap()
            .parse::<i64>()
            .is_ok());
        assert!(!headers["KALSHI-ACCESS-SIGNATURE"].is_empty());
    }
}

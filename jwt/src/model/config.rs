use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::prelude::*;

/// What the signature engine signs and verifies with
///
/// Only one of `secret` or the key pair is relevant at a time, depending on
/// [SignatureAlgorithmKind::requires_key_pair] for the current algorithm. The other one is kept
/// so that switching back and forth does not lose what was typed.
#[derive(Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConfig {
    /// Algorithm written to the header's 'alg' field when encoding
    #[serde(default)]
    pub algorithm: SignatureAlgorithm,
    /// HMAC secret text, see `secret_encoding`
    #[serde(default)]
    pub secret: String,
    /// How to read `secret`
    #[serde(default)]
    pub secret_encoding: SecretEncoding,
    /// RSA or EC public key
    #[serde(default)]
    pub public_key: Pem,
    /// RSA or EC private key
    #[serde(default)]
    pub private_key: Pem,
}

impl SignatureConfig {
    /// HMAC configuration with a raw secret
    pub fn hmac(algorithm: SignatureAlgorithm, secret: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.algorithm = algorithm;
        config.secret = secret.into();
        config
    }

    /// RSA or ECDSA configuration
    pub fn key_pair(algorithm: SignatureAlgorithm, public_key: impl Into<Pem>, private_key: impl Into<Pem>) -> Self {
        let mut config = Self::default();
        config.algorithm = algorithm;
        config.public_key = public_key.into();
        config.private_key = private_key.into();
        config
    }

    /// Same configuration with another secret encoding
    pub fn with_secret_encoding(mut self, secret_encoding: SecretEncoding) -> Self {
        self.secret_encoding = secret_encoding;
        self
    }

    /// Family of the configured algorithm
    pub fn kind(&self) -> SignatureAlgorithmKind {
        self.algorithm.kind()
    }
}

impl std::fmt::Debug for SignatureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &"***")
            .field("secret_encoding", &self.secret_encoding)
            .field("public_key", &self.public_key)
            .field("private_key", &"***")
            .finish()
    }
}

impl Drop for SignatureConfig {
    fn drop(&mut self) {
        self.secret.zeroize();
        self.private_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_partial_config() {
        let config: SignatureConfig = serde_json::from_str(r#"{"algorithm":"HS512","secretEncoding":"base64"}"#).unwrap();
        assert_eq!(config.algorithm, SignatureAlgorithm::HS512);
        assert_eq!(config.secret_encoding, SecretEncoding::Base64);
        assert!(config.secret.is_empty());
        assert!(config.public_key.is_blank());
    }

    #[test]
    fn debug_should_not_leak_secrets() {
        let config = SignatureConfig::hmac(SignatureAlgorithm::HS256, "top-secret");
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}

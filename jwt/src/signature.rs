use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::{
    key::{AnyPrivateKey, AnyPublicKey, read_private_key, read_public_key},
    prelude::*,
    token::{decode_segment, encode_segment},
};

/// Key material read out of a [SignatureConfig], never cached
enum SigningMaterial {
    Secret(Zeroizing<Vec<u8>>),
    KeyPair(AnyPublicKey, AnyPrivateKey),
}

/// Outcome of checking the signature segment of an encoded token
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SignatureCheck {
    /// Segment matches the expected signature
    Valid,
    /// Segment does not match
    Invalid,
    /// Key material is missing or malformed, see the engine's error holders
    Unavailable,
}

/// Computes and verifies signatures with the material of a [SignatureConfig]
///
/// Keys are parsed anew on every call since their text may change at any time. Problems with
/// the secret or either key land in the matching error holder; both keys of a pair are required
/// even though signing only uses the private one.
#[derive(Debug, Default)]
pub struct SignatureEngine {
    secret_errors: ErrorHolder,
    public_key_errors: ErrorHolder,
    private_key_errors: ErrorHolder,
}

impl SignatureEngine {
    /// Engine with no error held
    pub fn new() -> Self {
        Self::default()
    }

    /// Error about the HMAC secret, if any
    pub fn secret_errors(&self) -> &ErrorHolder {
        &self.secret_errors
    }

    /// Error about the public key, if any
    pub fn public_key_errors(&self) -> &ErrorHolder {
        &self.public_key_errors
    }

    /// Error about the private key, if any
    pub fn private_key_errors(&self) -> &ErrorHolder {
        &self.private_key_errors
    }

    /// Reads the material for the configured algorithm and populates the error holders,
    /// without signing. Returns whether signing is possible.
    pub fn validate_keys(&mut self, config: &SignatureConfig) -> bool {
        self.read_material(config).is_some()
    }

    /// Signs `message` with the configured algorithm
    ///
    /// `Ok(None)` means the key material is unusable, in which case the error holders tell why.
    /// An error means the computation itself failed with well-formed material.
    pub fn sign(&mut self, config: &SignatureConfig, message: &[u8]) -> JwtToolResult<Option<Vec<u8>>> {
        let Some(material) = self.read_material(config) else {
            return Ok(None);
        };
        compute(&material, config.algorithm, message).map(Some)
    }

    /// Recomputes the signature of `message` and compares its base64url form with `segment`
    ///
    /// ECDSA signatures made elsewhere use a random nonce so they cannot be recomputed: when
    /// the comparison fails they are checked against the public key.
    pub fn verify(&mut self, config: &SignatureConfig, message: &[u8], segment: &str) -> JwtToolResult<SignatureCheck> {
        let Some(material) = self.read_material(config) else {
            return Ok(SignatureCheck::Unavailable);
        };
        let expected = compute(&material, config.algorithm, message)?;
        if encode_segment(expected) == segment {
            return Ok(SignatureCheck::Valid);
        }
        if let (SignatureAlgorithmKind::Ecdsa, SigningMaterial::KeyPair(pk, _)) = (config.kind(), &material) {
            // segments differing only in unused trailing bits decode alike, only the canonical one counts
            let verified = decode_segment(segment)
                .ok()
                .filter(|signature| encode_segment(signature) == segment)
                .is_some_and(|signature| pk.verify(config.algorithm, message, &signature).is_ok());
            if verified {
                tracing::debug!(alg = %config.algorithm, "ECDSA signature verified with the public key");
                return Ok(SignatureCheck::Valid);
            }
        }
        Ok(SignatureCheck::Invalid)
    }

    fn read_material(&mut self, config: &SignatureConfig) -> Option<SigningMaterial> {
        self.secret_errors.clear();
        self.public_key_errors.clear();
        self.private_key_errors.clear();

        match config.kind() {
            SignatureAlgorithmKind::Hmac => {
                let secret = config.secret_encoding.decode(&config.secret).and_then(|secret| {
                    if secret.is_empty() {
                        Err(JwtToolError::MissingKey(KeyRole::Secret))
                    } else {
                        Ok(secret)
                    }
                });
                let secret = self.secret_errors.check(secret)?;
                Some(SigningMaterial::Secret(Zeroizing::new(secret)))
            }
            kind => {
                let pk = self.public_key_errors.check(read_public_key(&config.public_key, kind));
                let sk = self.private_key_errors.check(read_private_key(&config.private_key, kind));
                Some(SigningMaterial::KeyPair(pk?, sk?))
            }
        }
    }
}

fn compute(material: &SigningMaterial, alg: SignatureAlgorithm, message: &[u8]) -> JwtToolResult<Vec<u8>> {
    match material {
        SigningMaterial::Secret(secret) => hmac_sign(alg.hash(), secret, message),
        SigningMaterial::KeyPair(_, sk) => sk.sign(alg, message),
    }
}

fn hmac_sign(hash: HashAlgorithm, key: &[u8], message: &[u8]) -> JwtToolResult<Vec<u8>> {
    Ok(match hash {
        HashAlgorithm::SHA256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(JwtToolError::signature)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::SHA384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(key).map_err(JwtToolError::signature)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::SHA512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(JwtToolError::signature)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
    })
}

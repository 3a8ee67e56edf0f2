use ::rsa::{
    RsaPrivateKey, RsaPublicKey, pkcs1v15,
    pkcs8::{DecodePrivateKey, DecodePublicKey},
};
use sha2::{Sha256, Sha384, Sha512};
use signature::{SignatureEncoding, Signer, Verifier};

use crate::{
    key::{AnyPrivateKey, AnyPublicKey},
    prelude::*,
};

pub(super) fn public_key_from_der(der: &[u8]) -> JwtToolResult<AnyPublicKey> {
    RsaPublicKey::from_public_key_der(der)
        .map(AnyPublicKey::Rsa)
        .map_err(|e| JwtToolError::key_format(KeyRole::PublicKey, e))
}

pub(super) fn private_key_from_der(der: &[u8]) -> JwtToolResult<AnyPrivateKey> {
    RsaPrivateKey::from_pkcs8_der(der)
        .map(AnyPrivateKey::Rsa)
        .map_err(|e| JwtToolError::key_format(KeyRole::PrivateKey, e))
}

/// RSASSA-PKCS1-v1_5 signature
pub(super) fn sign(key: &RsaPrivateKey, hash: HashAlgorithm, message: &[u8]) -> JwtToolResult<Vec<u8>> {
    let signature = match hash {
        HashAlgorithm::SHA256 => pkcs1v15::SigningKey::<Sha256>::new(key.clone()).try_sign(message),
        HashAlgorithm::SHA384 => pkcs1v15::SigningKey::<Sha384>::new(key.clone()).try_sign(message),
        HashAlgorithm::SHA512 => pkcs1v15::SigningKey::<Sha512>::new(key.clone()).try_sign(message),
    }
    .map_err(JwtToolError::signature)?;
    Ok(signature.to_vec())
}

pub(super) fn verify(key: &RsaPublicKey, hash: HashAlgorithm, message: &[u8], signature: &[u8]) -> JwtToolResult<()> {
    let signature = pkcs1v15::Signature::try_from(signature).map_err(|_| JwtToolError::InvalidSignature)?;
    match hash {
        HashAlgorithm::SHA256 => pkcs1v15::VerifyingKey::<Sha256>::new(key.clone()).verify(message, &signature),
        HashAlgorithm::SHA384 => pkcs1v15::VerifyingKey::<Sha384>::new(key.clone()).verify(message, &signature),
        HashAlgorithm::SHA512 => pkcs1v15::VerifyingKey::<Sha512>::new(key.clone()).verify(message, &signature),
    }
    .map_err(|_| JwtToolError::InvalidSignature)
}

use const_oid::ObjectIdentifier;
use pkcs8::{DecodePrivateKey, DecodePublicKey};
use signature::{Signer, Verifier};

use crate::{
    key::{AnyPrivateKey, AnyPublicKey},
    prelude::*,
};

/// NIST curve of an EC key
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, derive_more::Display)]
pub enum EcCurve {
    /// secp256r1
    #[display("P-256")]
    P256,
    /// secp384r1
    #[display("P-384")]
    P384,
    /// secp521r1
    #[display("P-521")]
    P521,
}

impl EcCurve {
    const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
    const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
    const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

    /// Named curve OID from RFC 5480
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            Self::P256 => Self::SECP256R1,
            Self::P384 => Self::SECP384R1,
            Self::P521 => Self::SECP521R1,
        }
    }

    /// Curve for a named curve OID
    pub fn from_oid(oid: ObjectIdentifier) -> Option<Self> {
        [Self::P256, Self::P384, Self::P521].into_iter().find(|c| c.oid() == oid)
    }

    /// Curve an ECDSA algorithm signs over, `None` for other families
    pub fn for_algorithm(alg: SignatureAlgorithm) -> Option<Self> {
        match alg {
            SignatureAlgorithm::ES256 => Some(Self::P256),
            SignatureAlgorithm::ES384 => Some(Self::P384),
            SignatureAlgorithm::ES512 => Some(Self::P521),
            _ => None,
        }
    }
}

impl AnyPublicKey {
    /// Curve of an EC key
    pub fn curve(&self) -> Option<EcCurve> {
        match self {
            Self::Rsa(_) => None,
            Self::P256(_) => Some(EcCurve::P256),
            Self::P384(_) => Some(EcCurve::P384),
            Self::P521(_) => Some(EcCurve::P521),
        }
    }
}

impl AnyPrivateKey {
    /// Curve of an EC key
    pub fn curve(&self) -> Option<EcCurve> {
        match self {
            Self::Rsa(_) => None,
            Self::P256(_) => Some(EcCurve::P256),
            Self::P384(_) => Some(EcCurve::P384),
            Self::P521(_) => Some(EcCurve::P521),
        }
    }
}

pub(super) fn public_key_from_der(der: &[u8], curve: EcCurve) -> JwtToolResult<AnyPublicKey> {
    match curve {
        EcCurve::P256 => p256::PublicKey::from_public_key_der(der).map(AnyPublicKey::P256),
        EcCurve::P384 => p384::PublicKey::from_public_key_der(der).map(AnyPublicKey::P384),
        EcCurve::P521 => p521::PublicKey::from_public_key_der(der).map(AnyPublicKey::P521),
    }
    .map_err(|e| JwtToolError::key_format(KeyRole::PublicKey, e))
}

pub(super) fn private_key_from_der(der: &[u8], curve: EcCurve) -> JwtToolResult<AnyPrivateKey> {
    match curve {
        EcCurve::P256 => p256::SecretKey::from_pkcs8_der(der).map(AnyPrivateKey::P256),
        EcCurve::P384 => p384::SecretKey::from_pkcs8_der(der).map(AnyPrivateKey::P384),
        EcCurve::P521 => p521::SecretKey::from_pkcs8_der(der).map(AnyPrivateKey::P521),
    }
    .map_err(|e| JwtToolError::key_format(KeyRole::PrivateKey, e))
}

fn curve_mismatch(alg: SignatureAlgorithm, found: Option<EcCurve>) -> JwtToolError {
    let expected = EcCurve::for_algorithm(alg).map(|c| c.to_string()).unwrap_or_default();
    match found {
        Some(found) => JwtToolError::signature(format!("{alg} requires a {expected} key but a {found} key was supplied")),
        None => JwtToolError::signature(format!("{alg} requires a {expected} key")),
    }
}

/// ECDSA signature as the fixed size concatenation of r and s, RFC 7518 Section 3.4
///
/// Nonces are derived per RFC 6979 so signing the same message twice yields the same bytes.
pub(super) fn sign(key: &AnyPrivateKey, alg: SignatureAlgorithm, message: &[u8]) -> JwtToolResult<Vec<u8>> {
    match (EcCurve::for_algorithm(alg), key) {
        (Some(EcCurve::P256), AnyPrivateKey::P256(sk)) => {
            let signature: p256::ecdsa::Signature = p256::ecdsa::SigningKey::from(sk)
                .try_sign(message)
                .map_err(JwtToolError::signature)?;
            Ok(signature.to_bytes().to_vec())
        }
        (Some(EcCurve::P384), AnyPrivateKey::P384(sk)) => {
            let signature: p384::ecdsa::Signature = p384::ecdsa::SigningKey::from(sk)
                .try_sign(message)
                .map_err(JwtToolError::signature)?;
            Ok(signature.to_bytes().to_vec())
        }
        (Some(EcCurve::P521), AnyPrivateKey::P521(sk)) => {
            // RFC 6979 nonce, p521::ecdsa::SigningKey picks a random one
            let signature: ::ecdsa::Signature<p521::NistP521> = ::ecdsa::SigningKey::<p521::NistP521>::from(sk)
                .try_sign(message)
                .map_err(JwtToolError::signature)?;
            Ok(signature.to_bytes().to_vec())
        }
        _ => Err(curve_mismatch(alg, key.curve())),
    }
}

pub(super) fn verify(key: &AnyPublicKey, alg: SignatureAlgorithm, message: &[u8], signature: &[u8]) -> JwtToolResult<()> {
    let verified = match (EcCurve::for_algorithm(alg), key) {
        (Some(EcCurve::P256), AnyPublicKey::P256(pk)) => p256::ecdsa::Signature::from_slice(signature)
            .and_then(|s| p256::ecdsa::VerifyingKey::from(pk).verify(message, &s)),
        (Some(EcCurve::P384), AnyPublicKey::P384(pk)) => p384::ecdsa::Signature::from_slice(signature)
            .and_then(|s| p384::ecdsa::VerifyingKey::from(pk).verify(message, &s)),
        (Some(EcCurve::P521), AnyPublicKey::P521(pk)) => ::ecdsa::Signature::<p521::NistP521>::from_slice(signature)
            .and_then(|s| ::ecdsa::VerifyingKey::<p521::NistP521>::from(pk).verify(message, &s)),
        _ => return Err(curve_mismatch(alg, key.curve())),
    };
    verified.map_err(|_| JwtToolError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use crate::{key::*, test_utils::*};

    #[apply(all_ecdsa_algorithms)]
    fn should_sign_with_fixed_size(#[case] alg: SignatureAlgorithm) {
        let key = TestKeys::new(alg);
        let sk = read_private_key(&key.sk, alg.kind()).unwrap();
        let signature = sk.sign(alg, b"message").unwrap();
        let expected = match alg {
            SignatureAlgorithm::ES256 => 64,
            SignatureAlgorithm::ES384 => 96,
            _ => 132,
        };
        assert_eq!(signature.len(), expected);
    }

    #[apply(all_ecdsa_algorithms)]
    fn should_be_deterministic(#[case] alg: SignatureAlgorithm) {
        let key = TestKeys::new(alg);
        let sk = read_private_key(&key.sk, alg.kind()).unwrap();
        assert_eq!(sk.sign(alg, b"message").unwrap(), sk.sign(alg, b"message").unwrap());
    }

    #[apply(all_ecdsa_algorithms)]
    fn should_verify_own_signature(#[case] alg: SignatureAlgorithm) {
        let key = TestKeys::new(alg);
        let pk = read_public_key(&key.pk, alg.kind()).unwrap();
        let sk = read_private_key(&key.sk, alg.kind()).unwrap();
        let signature = sk.sign(alg, b"message").unwrap();
        assert!(pk.verify(alg, b"message", &signature).is_ok());
        assert!(matches!(
            pk.verify(alg, b"tampered", &signature).unwrap_err(),
            JwtToolError::InvalidSignature
        ));
        assert!(matches!(
            pk.verify(alg, b"message", &signature[1..]).unwrap_err(),
            JwtToolError::InvalidSignature
        ));
    }

    #[test]
    fn should_refuse_curve_mismatch() {
        let sk = read_private_key(&SAMPLE_EC_PRIVATE_KEY.into(), SignatureAlgorithmKind::Ecdsa).unwrap();
        let result = sk.sign(SignatureAlgorithm::ES384, b"message");
        assert!(matches!(result.unwrap_err(), JwtToolError::SignatureError(e) if e.contains("P-384")));

        let pk = read_public_key(&SAMPLE_EC_PUBLIC_KEY.into(), SignatureAlgorithmKind::Ecdsa).unwrap();
        let result = pk.verify(SignatureAlgorithm::ES512, b"message", &[0; 132]);
        assert!(matches!(result.unwrap_err(), JwtToolError::SignatureError(_)));
    }

    #[rstest]
    #[case(EcCurve::P256, "1.2.840.10045.3.1.7")]
    #[case(EcCurve::P384, "1.3.132.0.34")]
    #[case(EcCurve::P521, "1.3.132.0.35")]
    fn should_map_curve_oids(#[case] curve: EcCurve, #[case] oid: &str) {
        let oid = const_oid::ObjectIdentifier::new_unwrap(oid);
        assert_eq!(curve.oid(), oid);
        assert_eq!(EcCurve::from_oid(oid), Some(curve));
    }
}

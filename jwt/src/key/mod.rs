use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use const_oid::ObjectIdentifier;
use lazy_static::lazy_static;
use regex::Regex;

pub use self::ecdsa::EcCurve;

use crate::prelude::*;

/// ECDSA keys over NIST curves
pub mod ecdsa;
/// RSA keys
pub mod rsa;

/// rsaEncryption, RFC 8017
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// id-ecPublicKey, RFC 5480
const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

const KEY_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

lazy_static! {
    // labels are never checked, "BEGIN EC PUBLIC KEY" may well close with "END RSA PUBLIC KEY"
    static ref ARMOR: Regex = Regex::new(r"-+\s*(BEGIN|END)[^-]*KEY\s*-+").unwrap();
}

/// Strips the PEM armor lines and any whitespace, then base64-decodes what is left
pub fn parse_raw_key_bytes(pem: &str, role: KeyRole) -> JwtToolResult<Vec<u8>> {
    if pem.trim().is_empty() {
        return Err(JwtToolError::MissingKey(role));
    }
    let body = ARMOR.replace_all(pem, "");
    let body = body.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    if body.is_empty() {
        return Err(JwtToolError::key_format(role, "it has no content between its armor lines"));
    }
    KEY_BASE64
        .decode(body)
        .map_err(|e| JwtToolError::key_format(role, e))
}

/// Algorithm named by the AlgorithmIdentifier of a SubjectPublicKeyInfo or PKCS#8 structure
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum KeyAlgorithm {
    Rsa,
    Ec(Option<EcCurve>),
    Other,
}

impl KeyAlgorithm {
    fn identify(oid: ObjectIdentifier, parameters: Option<ObjectIdentifier>) -> Self {
        if oid == RSA_ENCRYPTION {
            Self::Rsa
        } else if oid == ID_EC_PUBLIC_KEY {
            Self::Ec(parameters.and_then(EcCurve::from_oid))
        } else {
            Self::Other
        }
    }

    /// Picks the curve out of an EC key when it belongs to `kind`
    fn check(self, kind: SignatureAlgorithmKind, role: KeyRole) -> JwtToolResult<Option<EcCurve>> {
        match (kind, self) {
            (SignatureAlgorithmKind::Rsa, Self::Rsa) => Ok(None),
            (SignatureAlgorithmKind::Ecdsa, Self::Ec(Some(curve))) => Ok(Some(curve)),
            (SignatureAlgorithmKind::Ecdsa, Self::Ec(None)) => Err(JwtToolError::key_format(
                role,
                "its elliptic curve is not one of P-256, P-384 or P-521",
            )),
            (SignatureAlgorithmKind::Hmac, _) => Err(JwtToolError::key_format(role, "HMAC signs with a secret")),
            (expected, found) => {
                let expected = match expected {
                    SignatureAlgorithmKind::Rsa => "an RSA key",
                    _ => "an EC key",
                };
                Err(JwtToolError::key_format(
                    role,
                    format!("{expected} was expected but {} was found", found.describe()),
                ))
            }
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Rsa => "an RSA key",
            Self::Ec(_) => "an EC key",
            Self::Other => "a key of an unknown algorithm",
        }
    }
}

/// Public half of a key pair, for any supported key algorithm
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AnyPublicKey {
    /// RSA public key
    Rsa(::rsa::RsaPublicKey),
    /// EC key on P-256
    P256(p256::PublicKey),
    /// EC key on P-384
    P384(p384::PublicKey),
    /// EC key on P-521
    P521(p521::PublicKey),
}

/// Private half of a key pair, for any supported key algorithm
#[derive(Clone)]
pub enum AnyPrivateKey {
    /// RSA private key
    Rsa(::rsa::RsaPrivateKey),
    /// EC key on P-256
    P256(p256::SecretKey),
    /// EC key on P-384
    P384(p384::SecretKey),
    /// EC key on P-521
    P521(p521::SecretKey),
}

impl std::fmt::Debug for AnyPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Rsa(_) => "Rsa",
            Self::P256(_) => "P256",
            Self::P384(_) => "P384",
            Self::P521(_) => "P521",
        };
        f.debug_tuple(name).field(&"***").finish()
    }
}

/// Reads a DER X.509 SubjectPublicKeyInfo as a public key of the given family
pub fn to_public_key(der: &[u8], kind: SignatureAlgorithmKind) -> JwtToolResult<AnyPublicKey> {
    let role = KeyRole::PublicKey;
    let spki = spki::SubjectPublicKeyInfoRef::try_from(der).map_err(|e| JwtToolError::key_format(role, e))?;
    let algorithm = KeyAlgorithm::identify(spki.algorithm.oid, spki.algorithm.parameters_oid().ok());
    match algorithm.check(kind, role)? {
        None => rsa::public_key_from_der(der),
        Some(curve) => ecdsa::public_key_from_der(der, curve),
    }
}

/// Reads a DER PKCS#8 PrivateKeyInfo as a private key of the given family
pub fn to_private_key(der: &[u8], kind: SignatureAlgorithmKind) -> JwtToolResult<AnyPrivateKey> {
    let role = KeyRole::PrivateKey;
    let info = pkcs8::PrivateKeyInfo::try_from(der).map_err(|e| JwtToolError::key_format(role, e))?;
    let algorithm = KeyAlgorithm::identify(info.algorithm.oid, info.algorithm.parameters_oid().ok());
    match algorithm.check(kind, role)? {
        None => rsa::private_key_from_der(der),
        Some(curve) => ecdsa::private_key_from_der(der, curve),
    }
}

/// [parse_raw_key_bytes] then [to_public_key]
pub fn read_public_key(pem: &Pem, kind: SignatureAlgorithmKind) -> JwtToolResult<AnyPublicKey> {
    to_public_key(&parse_raw_key_bytes(pem, KeyRole::PublicKey)?, kind)
}

/// [parse_raw_key_bytes] then [to_private_key]
pub fn read_private_key(pem: &Pem, kind: SignatureAlgorithmKind) -> JwtToolResult<AnyPrivateKey> {
    to_private_key(&parse_raw_key_bytes(pem, KeyRole::PrivateKey)?, kind)
}

impl AnyPrivateKey {
    /// Signs `message` with the digest of `alg`
    ///
    /// ECDSA needs the curve of the key to match the algorithm, e.g. ES384 with a P-384 key.
    pub fn sign(&self, alg: SignatureAlgorithm, message: &[u8]) -> JwtToolResult<Vec<u8>> {
        match (alg.kind(), self) {
            (SignatureAlgorithmKind::Rsa, Self::Rsa(key)) => rsa::sign(key, alg.hash(), message),
            (SignatureAlgorithmKind::Ecdsa, key) => ecdsa::sign(key, alg, message),
            _ => Err(JwtToolError::signature(format!("{alg} cannot sign with this key"))),
        }
    }
}

impl AnyPublicKey {
    /// Checks `signature` over `message` with the digest of `alg`
    pub fn verify(&self, alg: SignatureAlgorithm, message: &[u8], signature: &[u8]) -> JwtToolResult<()> {
        match (alg.kind(), self) {
            (SignatureAlgorithmKind::Rsa, Self::Rsa(key)) => rsa::verify(key, alg.hash(), message, signature),
            (SignatureAlgorithmKind::Ecdsa, key) => ecdsa::verify(key, alg, message, signature),
            _ => Err(JwtToolError::signature(format!("{alg} cannot verify with this key"))),
        }
    }
}

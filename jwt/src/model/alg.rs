use std::fmt::Formatter;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Family of a [SignatureAlgorithm], deciding which key material signs a token
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SignatureAlgorithmKind {
    /// Keyed hash over a shared secret
    Hmac,
    /// RSASSA-PKCS1-v1_5
    Rsa,
    /// ECDSA over a NIST curve
    Ecdsa,
}

impl SignatureAlgorithmKind {
    /// Whether a public/private key pair is needed instead of a secret
    pub fn requires_key_pair(&self) -> bool {
        match self {
            Self::Hmac => false,
            Self::Rsa | Self::Ecdsa => true,
        }
    }
}

/// Hash function backing a [SignatureAlgorithm]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    SHA256,
    /// SHA-384
    SHA384,
    /// SHA-512
    SHA512,
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HashAlgorithm::SHA256 => "SHA-256",
            HashAlgorithm::SHA384 => "SHA-384",
            HashAlgorithm::SHA512 => "SHA-512",
        };
        write!(f, "{name}")
    }
}

/// Narrows the supported signature algorithms to the ones we define
///
/// Specified in [RFC 7518 Section 3.1: "alg" (Algorithm) Header Parameter Values for JWS][1]
///
/// [1]: https://tools.ietf.org/html/rfc7518#section-3.1
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SignatureAlgorithm {
    /// HMAC using SHA-256
    #[default]
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// ECDSA using P-521 and SHA-512
    ES512,
}

impl SignatureAlgorithm {
    /// Every supported algorithm, in display order
    pub const ALL: [Self; 9] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
    ];

    /// Value of the header's 'alg' field
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
        }
    }

    /// Family of this algorithm
    pub fn kind(&self) -> SignatureAlgorithmKind {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => SignatureAlgorithmKind::Hmac,
            Self::RS256 | Self::RS384 | Self::RS512 => SignatureAlgorithmKind::Rsa,
            Self::ES256 | Self::ES384 | Self::ES512 => SignatureAlgorithmKind::Ecdsa,
        }
    }

    /// Digest used when signing
    pub fn hash(&self) -> HashAlgorithm {
        match self {
            Self::HS256 | Self::RS256 | Self::ES256 => HashAlgorithm::SHA256,
            Self::HS384 | Self::RS384 | Self::ES384 => HashAlgorithm::SHA384,
            Self::HS512 | Self::RS512 | Self::ES512 => HashAlgorithm::SHA512,
        }
    }

    /// Looks an algorithm up by the value found in a header's 'alg' field
    pub fn find_by_wire_name(alg: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.wire_name() == alg)
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl TryFrom<&str> for SignatureAlgorithm {
    type Error = JwtToolError;

    fn try_from(alg: &str) -> JwtToolResult<Self> {
        Self::find_by_wire_name(alg).ok_or_else(|| JwtToolError::UnsupportedAlgorithm(alg.to_string()))
    }
}

impl TryFrom<String> for SignatureAlgorithm {
    type Error = JwtToolError;

    fn try_from(alg: String) -> JwtToolResult<Self> {
        alg.as_str().try_into()
    }
}

impl From<SignatureAlgorithm> for String {
    fn from(alg: SignatureAlgorithm) -> Self {
        alg.wire_name().to_string()
    }
}

#[cfg(test)]
impl SignatureAlgorithm {
    /// Utility for listing JWA signature schemes not supported by this crate
    pub const UNSUPPORTED: [&'static str; 6] = ["PS256", "PS384", "PS512", "EdDSA", "none", "hs256"];
}

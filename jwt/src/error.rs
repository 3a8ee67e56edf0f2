/// Wrapper over a [Result] with a [JwtToolError] error
pub type JwtToolResult<T> = Result<T, JwtToolError>;

/// Which piece of signing material an error is about
#[derive(Debug, Copy, Clone, Eq, PartialEq, derive_more::Display)]
pub enum KeyRole {
    /// HMAC shared secret
    #[display("secret")]
    Secret,
    /// X.509 SubjectPublicKeyInfo key
    #[display("public key")]
    PublicKey,
    /// PKCS#8 private key
    #[display("private key")]
    PrivateKey,
}

/// All errors which [crate::JwtTool] and its collaborators might produce
#[derive(Debug, thiserror::Error)]
pub enum JwtToolError {
    /// Segment is not valid base64url
    #[error("Invalid Base64URL encoding because {0}")]
    Base64DecodeError(#[from] base64::DecodeError),
    /// Decoded segment is not valid UTF-8
    #[error("Decoded segment is not valid UTF-8 because {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    /// Json error
    #[error("Invalid JSON because {0}")]
    JsonError(#[from] serde_json::Error),
    /// Header has no 'alg' field
    #[error("Missing algorithm header field: 'alg'")]
    MissingAlgorithm,
    /// Header 'alg' field is not one of the supported wire names
    #[error("Unsupported algorithm: '{0}'")]
    UnsupportedAlgorithm(String),
    /// Key material was left blank
    #[error("A {0} must be provided")]
    MissingKey(KeyRole),
    /// Key material could not be decoded
    #[error("Invalid {0} because {1}")]
    KeyFormat(KeyRole, String),
    /// Signature computation failed with well-formed key material
    #[error("Failed to calculate signature: {0}")]
    SignatureError(String),
    /// Recomputed signature mismatches the one in the token
    #[error("Invalid signature")]
    InvalidSignature,
    /// Encoded JWT lacks a third segment, or its header could not be read
    #[error("Encoded JWT does not have a signature part")]
    MissingSignaturePart,
    /// Encoded JWT has a fourth or later segment
    #[error("Encoded JWT has more than three parts")]
    TooManyParts,
    /// Header or payload errors prevent signing
    #[error("Unable to calculate signature due to header or payload errors")]
    UnsignableToken,
    /// Secret or key pair of the signature configuration is unusable
    #[error("Invalid signature algorithm configuration")]
    InvalidSignatureConfiguration,
}

impl JwtToolError {
    /// Malformed base64 or JSON input
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Base64DecodeError(_) | Self::Utf8Error(_) | Self::JsonError(_)
        )
    }

    /// Missing or malformed secret or key
    pub fn is_key_material_error(&self) -> bool {
        matches!(self, Self::MissingKey(_) | Self::KeyFormat(..))
    }

    pub(crate) fn key_format(role: KeyRole, cause: impl std::fmt::Display) -> Self {
        Self::KeyFormat(role, cause.to_string())
    }

    pub(crate) fn signature(cause: impl std::fmt::Display) -> Self {
        Self::SignatureError(cause.to_string())
    }
}

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Standard alphabet, padding optional
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How the HMAC secret text maps to the bytes keying the MAC
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretEncoding {
    /// UTF-8 bytes of the text as-is
    #[default]
    Raw,
    /// RFC 4648 base32 text
    Base32,
    /// RFC 4648 standard base64 text
    Base64,
}

impl SecretEncoding {
    /// Every encoding, in display order
    pub const ALL: [Self; 3] = [Self::Raw, Self::Base32, Self::Base64];

    /// Human readable name
    pub fn title(&self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Base32 => "Base32 Encoded",
            Self::Base64 => "Base64 Encoded",
        }
    }

    /// Turns the secret text into key bytes
    pub fn decode(&self, secret: &str) -> JwtToolResult<Vec<u8>> {
        match self {
            Self::Raw => Ok(secret.as_bytes().to_vec()),
            Self::Base32 => {
                let normalized = secret
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '=')
                    .collect::<String>()
                    .to_ascii_uppercase();
                data_encoding::BASE32_NOPAD
                    .decode(normalized.as_bytes())
                    .map_err(|e| JwtToolError::key_format(KeyRole::Secret, e))
            }
            Self::Base64 => {
                let normalized = secret.chars().filter(|c| !c.is_whitespace()).collect::<String>();
                LENIENT_STANDARD
                    .decode(normalized)
                    .map_err(|e| JwtToolError::key_format(KeyRole::Secret, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;

    use super::*;

    #[rstest]
    #[case(SecretEncoding::Raw, "s3cre!")]
    #[case(SecretEncoding::Base32, "OMZWG4TFEE======")]
    #[case(SecretEncoding::Base32, "omzwg4tfee")]
    #[case(SecretEncoding::Base64, "czNjcmUh")]
    #[case(SecretEncoding::Base64, "czNj\ncmUh")]
    fn should_decode_to_the_same_bytes(#[case] encoding: SecretEncoding, #[case] secret: &str) {
        assert_eq!(encoding.decode(secret).unwrap(), SAMPLE_SECRET.as_bytes());
    }

    #[rstest]
    #[case(SecretEncoding::Base32, "0189")]
    #[case(SecretEncoding::Base64, "*not base64*")]
    fn should_fail_on_malformed_secret(#[case] encoding: SecretEncoding, #[case] secret: &str) {
        let result = encoding.decode(secret);
        assert!(matches!(result.unwrap_err(), JwtToolError::KeyFormat(KeyRole::Secret, _)));
    }

    #[test]
    fn raw_should_keep_whitespace() {
        assert_eq!(SecretEncoding::Raw.decode(" a b ").unwrap(), b" a b ");
    }
}

//! Compact serialization: `header.payload.signature`, each segment base64url encoded
//!
//! Specified in [RFC 7515 Section 7.1][1]
//!
//! [1]: https://tools.ietf.org/html/rfc7515#section-7.1

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    prelude::BASE64_URL_SAFE_NO_PAD,
};
use serde_json::Value;

use crate::prelude::*;

/// Separates the segments of an encoded token
pub const SEPARATOR: char = '.';

/// Url-safe alphabet, padding optional
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// The three textual slots under edit
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Token {
    /// Compact serialization
    pub encoded: String,
    /// Header JSON, as displayed
    pub header: String,
    /// Payload JSON, as displayed
    pub payload: String,
}

/// Splits an encoded token on every [SEPARATOR]. Empty text has no segment at all.
pub fn split(encoded: &str) -> Vec<&str> {
    if encoded.is_empty() {
        return vec![];
    }
    encoded.split(SEPARATOR).collect()
}

/// Decodes a base64url segment, padded or not
///
/// Segments written with the standard alphabet (`+` and `/`) are accepted as well.
pub fn decode_segment(segment: &str) -> JwtToolResult<Vec<u8>> {
    let normalized = segment
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect::<String>();
    Ok(LENIENT_URL_SAFE.decode(normalized)?)
}

/// [decode_segment] then UTF-8
pub fn decode_segment_text(segment: &str) -> JwtToolResult<String> {
    Ok(String::from_utf8(decode_segment(segment)?)?)
}

/// Base64url without padding
pub fn encode_segment(bytes: impl AsRef<[u8]>) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Joins the three segments with [SEPARATOR]
pub fn compose_token(header: &str, payload: &str, signature: &str) -> String {
    format!("{header}{SEPARATOR}{payload}{SEPARATOR}{signature}")
}

/// Bytes a signature is computed over: the first two segments as they are written
pub fn signing_input(header: &str, payload: &str) -> String {
    format!("{header}{SEPARATOR}{payload}")
}

/// Any JSON document. Blank text is an error.
pub fn parse_json(text: &str) -> JwtToolResult<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Reads the 'alg' field of a parsed header
pub fn parse_header(header: &Value) -> JwtToolResult<SignatureAlgorithm> {
    match header.get("alg") {
        None => Err(JwtToolError::MissingAlgorithm),
        Some(Value::String(alg)) => alg.as_str().try_into(),
        Some(other) => Err(JwtToolError::UnsupportedAlgorithm(other.to_string())),
    }
}

/// Re-serializes with a 2 spaces indentation, keeping the field order
pub fn pretty(json: &Value) -> JwtToolResult<String> {
    Ok(serde_json::to_string_pretty(json)?)
}

/// Overwrites the 'alg' field of a header object and pretty prints it
///
/// Fails when the header is not a JSON object.
pub fn set_algorithm_in_header(header: &str, alg: SignatureAlgorithm) -> JwtToolResult<String> {
    let mut json = parse_json(header)?;
    let Some(fields) = json.as_object_mut() else {
        return Err(<serde_json::Error as serde::de::Error>::custom("header is not a JSON object").into());
    };
    fields.insert("alg".to_string(), Value::String(alg.wire_name().to_string()));
    pretty(&json)
}

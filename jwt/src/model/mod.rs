/// Supported signature algorithms
pub mod alg;
/// Signature configuration
pub mod config;
/// Textual key material
pub mod pem;
/// HMAC secret encodings
pub mod secret;

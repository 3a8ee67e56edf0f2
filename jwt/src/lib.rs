//! Decodes, verifies, edits and re-signs JSON Web Tokens
//!
//! [JwtTool] keeps three textual slots consistent with each other: the compact token, its header
//! JSON and its payload JSON. Editing the token decodes it and checks its signature; editing the
//! header, the payload or the [SignatureConfig] encodes and signs them again. Conversions are
//! debounced on a tokio runtime. Errors never escape: each slot has an [ErrorHolder] the caller
//! displays.
//!
//! HMAC (HS256, HS384, HS512), RSASSA-PKCS1-v1_5 (RS256, RS384, RS512) and ECDSA (ES256, ES384,
//! ES512) are supported. Keys are PEM or bare base64 X.509 SubjectPublicKeyInfo and PKCS#8.
//!
//! The synchronous core is [convert::Converter], usable without a runtime.

#![deny(missing_docs)]
#![allow(clippy::single_component_path_imports)]

#[cfg(test)]
use rstest_reuse;

#[cfg(test)]
#[macro_use]
#[allow(missing_docs)]
pub mod test_utils;
// both imports above have to be defined at the beginning of the crate for rstest to work

/// Standard claims and highlight scanning
pub mod claims;
/// Tool settings and state snapshots
pub mod config;
/// Conversion passes between the token and its JSON parts
pub mod convert;
/// Cancellable delayed jobs
pub mod debounce;
mod error;
mod holder;
/// Public and private keys
pub mod key;
/// Algorithms and signature configuration
pub mod model;
pub mod sample;
/// Signing and verification
pub mod signature;
pub mod token;
mod tool;

pub mod prelude {
    //! Reexports
    pub use crate::{
        claims::{ClaimSpan, StandardClaim},
        config::{PersistenceSettings, ToolSettings, ToolSnapshot},
        convert::{ChangeOrigin, Converter},
        error::{JwtToolError, JwtToolResult, KeyRole},
        holder::ErrorHolder,
        model::{
            alg::{HashAlgorithm, SignatureAlgorithm, SignatureAlgorithmKind},
            config::SignatureConfig,
            pem::Pem,
            secret::SecretEncoding,
        },
        sample::*,
        signature::{SignatureCheck, SignatureEngine},
        tool::{Highlights, InputSlot, JwtTool},
    };
}

pub use prelude::*;

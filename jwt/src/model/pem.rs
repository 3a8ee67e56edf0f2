use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// UTF-8 String in the PEM (Privacy-Enhanced Mail) format, as typed by the user
///
/// Specified in [RFC 7468: Textual Encodings of PKIX, PKCS, and CMS Structures][1]. The armor
/// labels are not checked, only stripped, see [crate::key::parse_raw_key_bytes].
///
/// [1]: https://tools.ietf.org/html/rfc7468
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize, derive_more::Deref)]
#[serde(transparent)]
pub struct Pem(String);

impl Pem {
    /// Nothing but whitespace was entered
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Pem {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Pem {
    fn from(s: &str) -> Self {
        s.to_string().into()
    }
}

impl Zeroize for Pem {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

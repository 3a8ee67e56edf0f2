//! Registered and commonly used claims, and where they appear in header or payload text

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CLAIM_NAME: Regex = Regex::new(r#"\s?"(?P<name>[a-zA-Z_]+)"\s*:"#).unwrap();
}

/// Claims with a well known meaning
///
/// See [RFC 7519 Section 4.1][1] and [OpenID Connect Core Section 2][2]
///
/// [1]: https://tools.ietf.org/html/rfc7519#section-4.1
/// [2]: https://openid.net/specs/openid-connect-core-1_0.html#IDToken
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StandardClaim {
    /// iss
    Issuer,
    /// sub
    Subject,
    /// aud
    Audience,
    /// exp
    ExpirationTime,
    /// nbf
    NotBeforeTime,
    /// iat
    IssuedAtTime,
    /// jti
    JwtId,
    /// alg
    Algorithm,
    /// azp
    AuthorizedParty,
    /// sid
    SessionId,
    /// nonce
    Nonce,
    /// at_hash
    AccessTokenHash,
    /// c_hash
    CodeHash,
    /// act
    Actor,
}

impl StandardClaim {
    /// Every standard claim
    pub const ALL: [Self; 14] = [
        Self::Issuer,
        Self::Subject,
        Self::Audience,
        Self::ExpirationTime,
        Self::NotBeforeTime,
        Self::IssuedAtTime,
        Self::JwtId,
        Self::Algorithm,
        Self::AuthorizedParty,
        Self::SessionId,
        Self::Nonce,
        Self::AccessTokenHash,
        Self::CodeHash,
        Self::Actor,
    ];

    /// Name of the JSON field
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Issuer => "iss",
            Self::Subject => "sub",
            Self::Audience => "aud",
            Self::ExpirationTime => "exp",
            Self::NotBeforeTime => "nbf",
            Self::IssuedAtTime => "iat",
            Self::JwtId => "jti",
            Self::Algorithm => "alg",
            Self::AuthorizedParty => "azp",
            Self::SessionId => "sid",
            Self::Nonce => "nonce",
            Self::AccessTokenHash => "at_hash",
            Self::CodeHash => "c_hash",
            Self::Actor => "act",
        }
    }

    /// Short human readable name
    pub fn title(&self) -> &'static str {
        match self {
            Self::Issuer => "Issuer",
            Self::Subject => "Subject",
            Self::Audience => "Audience",
            Self::ExpirationTime => "Expiration Time",
            Self::NotBeforeTime => "Not Before Time",
            Self::IssuedAtTime => "Issued at Time",
            Self::JwtId => "JWT ID",
            Self::Algorithm => "Algorithm",
            Self::AuthorizedParty => "Authorized Party",
            Self::SessionId => "Session ID",
            Self::Nonce => "Nonce",
            Self::AccessTokenHash => "Access Token Hash Value",
            Self::CodeHash => "Code Hash Value",
            Self::Actor => "Actor",
        }
    }

    /// One sentence about what the claim means
    pub fn description(&self) -> &'static str {
        match self {
            Self::Issuer => "The issuer of the JWT.",
            Self::Subject => "The subject of the JWT (e.g., the user).",
            Self::Audience => "The recipient for which the JWT is intended.",
            Self::ExpirationTime => "The time after which the JWT expires.",
            Self::NotBeforeTime => "The time before which the JWT must not be accepted for processing.",
            Self::IssuedAtTime => "The time at which the JWT was issued.",
            Self::JwtId => "An unique identifier of this JWT.",
            Self::Algorithm => "The algorithm to calculate the signature of this JWT.",
            Self::AuthorizedParty => "The party to which the JWT was issued.",
            Self::SessionId => "An unique session ID.",
            Self::Nonce => "A value used to associate a client session with this JWT.",
            Self::AccessTokenHash => "The hash of an access token.",
            Self::CodeHash => "The hash of a code.",
            Self::Actor => "The party acting on behalf of the subject.",
        }
    }

    /// Claim named `field_name`, case-sensitive
    pub fn find_by_field_name(field_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.field_name() == field_name)
    }
}

impl std::fmt::Display for StandardClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.title(), self.field_name(), self.description())
    }
}

/// Where a standard claim's name sits in a JSON text
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClaimSpan {
    /// Which claim
    pub claim: StandardClaim,
    /// Byte range of the name, quotes excluded
    pub range: Range<usize>,
}

/// Finds every `"name":` of a standard claim. Unknown names and text inside string values that
/// does not look like a field are skipped.
pub fn claim_spans(text: &str) -> Vec<ClaimSpan> {
    CLAIM_NAME
        .captures_iter(text)
        .filter_map(|captures| {
            let name = captures.name("name")?;
            let claim = StandardClaim::find_by_field_name(name.as_str())?;
            Some(ClaimSpan {
                claim,
                range: name.range(),
            })
        })
        .collect()
}

/// Byte offsets of every '.' in an encoded token
pub fn dot_separator_offsets(encoded: &str) -> Vec<usize> {
    encoded.match_indices(crate::token::SEPARATOR).map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;

    use super::*;

    #[test]
    fn field_names_should_be_unique() {
        for claim in StandardClaim::ALL {
            assert_eq!(StandardClaim::find_by_field_name(claim.field_name()), Some(claim));
        }
        assert_eq!(StandardClaim::find_by_field_name("name"), None);
        assert_eq!(StandardClaim::find_by_field_name("ISS"), None);
    }

    #[test]
    fn should_find_standard_claims_only() {
        let text = "{\n  \"sub\": \"123\",\n  \"name\": \"John\",\n  \"at_hash\":\"x\"\n}";
        let spans = claim_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].claim, StandardClaim::Subject);
        assert_eq!(&text[spans[0].range.clone()], "sub");
        assert_eq!(spans[1].claim, StandardClaim::AccessTokenHash);
        assert_eq!(&text[spans[1].range.clone()], "at_hash");
    }

    #[test]
    fn should_not_match_values() {
        assert!(claim_spans(r#"{"name":"sub"}"#).is_empty());
    }

    #[test]
    fn should_find_sample_payload_claims() {
        let claims = claim_spans(SAMPLE_PAYLOAD).into_iter().map(|s| s.claim).collect::<Vec<_>>();
        assert_eq!(
            claims,
            vec![StandardClaim::JwtId, StandardClaim::Subject, StandardClaim::IssuedAtTime]
        );
    }

    #[rstest]
    #[case("", vec![])]
    #[case("abc", vec![])]
    #[case("a.b.c", vec![1, 3])]
    #[case("..", vec![0, 1])]
    fn should_locate_dots(#[case] encoded: &str, #[case] expected: Vec<usize>) {
        assert_eq!(dot_separator_offsets(encoded), expected);
    }

    #[test]
    fn display_should_describe_the_claim() {
        assert_eq!(
            StandardClaim::ExpirationTime.to_string(),
            "Expiration Time (exp): The time after which the JWT expires."
        );
    }
}

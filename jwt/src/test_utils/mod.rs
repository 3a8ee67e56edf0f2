use p256::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rand::rngs::OsRng;
pub use rstest::*;
pub use rstest_reuse::{self, *};

pub use crate::{prelude::*, sample::*};
pub use utils::*;

pub mod utils;

#[template]
#[rstest]
#[case::HS256(crate::model::alg::SignatureAlgorithm::HS256)]
#[case::HS384(crate::model::alg::SignatureAlgorithm::HS384)]
#[case::HS512(crate::model::alg::SignatureAlgorithm::HS512)]
#[case::RS256(crate::model::alg::SignatureAlgorithm::RS256)]
#[case::RS384(crate::model::alg::SignatureAlgorithm::RS384)]
#[case::RS512(crate::model::alg::SignatureAlgorithm::RS512)]
#[case::ES256(crate::model::alg::SignatureAlgorithm::ES256)]
#[case::ES384(crate::model::alg::SignatureAlgorithm::ES384)]
#[case::ES512(crate::model::alg::SignatureAlgorithm::ES512)]
#[allow(non_snake_case)]
pub fn all_algorithms(#[case] alg: SignatureAlgorithm) {}

#[template]
#[rstest]
#[case::RS256(crate::model::alg::SignatureAlgorithm::RS256)]
#[case::RS384(crate::model::alg::SignatureAlgorithm::RS384)]
#[case::RS512(crate::model::alg::SignatureAlgorithm::RS512)]
#[case::ES256(crate::model::alg::SignatureAlgorithm::ES256)]
#[case::ES384(crate::model::alg::SignatureAlgorithm::ES384)]
#[case::ES512(crate::model::alg::SignatureAlgorithm::ES512)]
#[allow(non_snake_case)]
pub fn all_key_algorithms(#[case] alg: SignatureAlgorithm) {}

#[template]
#[rstest]
#[case::ES256(crate::model::alg::SignatureAlgorithm::ES256)]
#[case::ES384(crate::model::alg::SignatureAlgorithm::ES384)]
#[case::ES512(crate::model::alg::SignatureAlgorithm::ES512)]
#[allow(non_snake_case)]
pub fn all_ecdsa_algorithms(#[case] alg: SignatureAlgorithm) {}

/// Material able to sign with one algorithm
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TestKeys {
    /// Algorithm
    pub alg: SignatureAlgorithm,
    /// HMAC secret, raw
    pub secret: String,
    /// PublicKey
    pub pk: Pem,
    /// SecretKey
    pub sk: Pem,
}

impl TestKeys {
    /// EC keys are fresh ones, RSA keys are the sample pair since generating one is slow
    pub fn new(alg: SignatureAlgorithm) -> Self {
        let (secret, (pk, sk)) = match alg {
            SignatureAlgorithm::HS256 | SignatureAlgorithm::HS384 | SignatureAlgorithm::HS512 => {
                (rand_str(32), (Pem::default(), Pem::default()))
            }
            SignatureAlgorithm::RS256 | SignatureAlgorithm::RS384 | SignatureAlgorithm::RS512 => (
                String::new(),
                (SAMPLE_RSA_PUBLIC_KEY.into(), SAMPLE_RSA_PRIVATE_KEY.into()),
            ),
            SignatureAlgorithm::ES256 => (String::new(), p256_keys()),
            SignatureAlgorithm::ES384 => (String::new(), p384_keys()),
            SignatureAlgorithm::ES512 => (String::new(), p521_keys()),
        };
        Self { alg, secret, pk, sk }
    }

    /// Configuration signing with these keys
    pub fn config(&self) -> SignatureConfig {
        match self.alg.kind() {
            SignatureAlgorithmKind::Hmac => SignatureConfig::hmac(self.alg, self.secret.clone()),
            _ => SignatureConfig::key_pair(self.alg, self.pk.clone(), self.sk.clone()),
        }
    }
}

fn p256_keys() -> (Pem, Pem) {
    let sk = p256::SecretKey::random(&mut OsRng);
    let pk = sk.public_key().to_public_key_pem(LineEnding::LF).unwrap();
    let sk = sk.to_pkcs8_pem(LineEnding::LF).unwrap();
    (pk.into(), sk.as_str().into())
}

fn p384_keys() -> (Pem, Pem) {
    let sk = p384::SecretKey::random(&mut OsRng);
    let pk = sk.public_key().to_public_key_pem(LineEnding::LF).unwrap();
    let sk = sk.to_pkcs8_pem(LineEnding::LF).unwrap();
    (pk.into(), sk.as_str().into())
}

fn p521_keys() -> (Pem, Pem) {
    let sk = p521::SecretKey::random(&mut OsRng);
    let pk = sk.public_key().to_public_key_pem(LineEnding::LF).unwrap();
    let sk = sk.to_pkcs8_pem(LineEnding::LF).unwrap();
    (pk.into(), sk.as_str().into())
}

use serde_json::{Map, Value};

use crate::token::{decode_segment_text, split};

pub fn rand_str(size: usize) -> String {
    use rand::distributions::{Alphanumeric, DistString};
    Alphanumeric.sample_string(&mut rand::thread_rng(), size)
}

pub fn jwt_header(token: &str) -> Map<String, Value> {
    jwt_part(token, 0)
}

pub fn jwt_claims(token: &str) -> Map<String, Value> {
    jwt_part(token, 1)
}

fn jwt_part(token: &str, part: usize) -> Map<String, Value> {
    let parts = split(token);
    let json = decode_segment_text(parts.get(part).unwrap()).unwrap();
    let json = serde_json::from_str::<Value>(&json).unwrap();
    json.as_object().unwrap().to_owned()
}

/// Flips one bit in the signature segment of an encoded token
pub fn tamper_signature(token: &str) -> String {
    let parts = split(token);
    let mut signature = crate::token::decode_segment(parts[2]).unwrap();
    signature[0] ^= 1;
    crate::token::compose_token(parts[0], parts[1], &crate::token::encode_segment(signature))
}

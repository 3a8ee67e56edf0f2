use serde_json::Value;

use crate::{
    prelude::*,
    signature::{SignatureCheck, SignatureEngine},
    token::{self, Token},
};

/// Which editable surface triggered a conversion pass, deciding its direction
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ChangeOrigin {
    /// The compact token was edited: decode it
    Encoded,
    /// Header or payload JSON was edited: encode them
    HeaderPayload,
    /// Algorithm, secret or keys were edited: write 'alg' into the header then encode
    SignatureConfiguration,
}

/// Keeps the encoded token, its header and payload JSON consistent with each other
///
/// Every pass clears the four error holders then repopulates them independently, so a broken
/// payload does not hide a broken header.
#[derive(Debug)]
pub struct Converter {
    token: Token,
    config: SignatureConfig,
    examples: ExampleData,
    load_examples: bool,
    engine: SignatureEngine,
    encoded_errors: ErrorHolder,
    header_errors: ErrorHolder,
    payload_errors: ErrorHolder,
    signature_errors: ErrorHolder,
}

impl Converter {
    /// Starts from empty slots. Example key material for the configured algorithm is loaded
    /// right away when `load_examples` is set.
    pub fn new(config: SignatureConfig, examples: ExampleData, load_examples: bool) -> Self {
        let mut converter = Self {
            token: Token::default(),
            config,
            examples,
            load_examples,
            engine: SignatureEngine::new(),
            encoded_errors: ErrorHolder::default(),
            header_errors: ErrorHolder::default(),
            payload_errors: ErrorHolder::default(),
            signature_errors: ErrorHolder::default(),
        };
        converter.handle_algorithm_change();
        converter
    }

    /// Runs the pass for `origin`
    pub fn convert(&mut self, origin: ChangeOrigin) {
        match origin {
            ChangeOrigin::Encoded => self.decode(),
            ChangeOrigin::HeaderPayload => self.encode(),
            ChangeOrigin::SignatureConfiguration => {
                self.set_algorithm_in_header();
                self.encode();
            }
        }
        tracing::debug!(
            ?origin,
            signature_valid = self.signature_valid(),
            encoded_error = self.encoded_errors.is_set(),
            header_error = self.header_errors.is_set(),
            payload_error = self.payload_errors.is_set(),
            "conversion done"
        );
    }

    /// Splits the encoded token into header and payload, then checks its signature
    pub fn decode(&mut self) {
        self.clear_errors();

        let encoded = self.token.encoded.clone();
        let segments = token::split(&encoded);
        if segments.len() > 3 {
            self.encoded_errors.set(JwtToolError::TooManyParts);
        }

        self.token.header = match segments.first() {
            Some(segment) => match decode_json(segment) {
                Ok(json) => {
                    if let Some(alg) = self.header_errors.check(token::parse_header(&json)) {
                        self.set_algorithm(alg);
                    }
                    self.display(&json, segment, Segment::Header)
                }
                Err(e) => {
                    self.header_errors.set(e);
                    segment.to_string()
                }
            },
            None => String::new(),
        };

        self.token.payload = match segments.get(1) {
            Some(segment) => match decode_json(segment) {
                Ok(json) => self.display(&json, segment, Segment::Payload),
                Err(e) => {
                    self.payload_errors.set(e);
                    segment.to_string()
                }
            },
            None => String::new(),
        };

        match segments.as_slice() {
            [header, payload, signature, ..] if !self.header_errors.is_set() => {
                let message = token::signing_input(header, payload);
                match self.engine.verify(&self.config, message.as_bytes(), signature) {
                    Ok(SignatureCheck::Valid) => {}
                    Ok(SignatureCheck::Invalid) => self.signature_errors.set(JwtToolError::InvalidSignature),
                    Ok(SignatureCheck::Unavailable) => {
                        self.signature_errors.set(JwtToolError::InvalidSignatureConfiguration)
                    }
                    Err(e) => {
                        tracing::warn!(alg = %self.config.algorithm, "could not compute the expected signature");
                        self.signature_errors.set(e)
                    }
                }
            }
            _ => self.signature_errors.set(JwtToolError::MissingSignaturePart),
        }
    }

    /// Signs the header and payload texts as they are, without re-serializing them
    pub fn encode(&mut self) {
        self.clear_errors();

        if let Some(json) = self.header_errors.check(token::parse_json(&self.token.header)) {
            if let Some(alg) = self.header_errors.check(token::parse_header(&json)) {
                self.set_algorithm(alg);
            }
        }
        // only checks that the payload is well-formed
        self.payload_errors.check(token::parse_json(&self.token.payload));

        if self.header_errors.is_set() || self.payload_errors.is_set() {
            self.token.encoded.clear();
            self.signature_errors.set(JwtToolError::UnsignableToken);
            return;
        }

        let header = token::encode_segment(&self.token.header);
        let payload = token::encode_segment(&self.token.payload);
        let message = token::signing_input(&header, &payload);
        match self.engine.sign(&self.config, message.as_bytes()) {
            Ok(Some(signature)) => {
                self.token.encoded = token::compose_token(&header, &payload, &token::encode_segment(signature));
            }
            Ok(None) => {
                self.token.encoded.clear();
                self.signature_errors.set(JwtToolError::InvalidSignatureConfiguration);
            }
            Err(e) => {
                tracing::warn!(alg = %self.config.algorithm, "could not compute the signature");
                self.token.encoded.clear();
                self.signature_errors.set(e);
            }
        }
    }

    /// Writes the configured algorithm into the header's 'alg' field
    ///
    /// A header which is not a JSON object is left untouched, the following encoding reports it.
    pub fn set_algorithm_in_header(&mut self) {
        if let Ok(header) = token::set_algorithm_in_header(&self.token.header, self.config.algorithm) {
            self.token.header = header;
        }
    }

    /// Replaces the signature configuration
    pub fn set_config(&mut self, config: SignatureConfig) {
        let algorithm_changed = config.algorithm != self.config.algorithm;
        self.config = config;
        if algorithm_changed {
            self.handle_algorithm_change();
        }
    }

    /// Selects another algorithm, keeping the rest of the configuration
    pub fn set_algorithm(&mut self, algorithm: SignatureAlgorithm) {
        if algorithm != self.config.algorithm {
            self.config.algorithm = algorithm;
            self.handle_algorithm_change();
        }
    }

    /// Loads example key material matching the algorithm family, without overwriting user input
    ///
    /// Key fields are filled when blank or when they still hold the example of the other family.
    /// Does nothing unless examples are enabled.
    fn handle_algorithm_change(&mut self) {
        if !self.load_examples {
            return;
        }
        match self.config.kind() {
            SignatureAlgorithmKind::Hmac => {
                if self.config.secret.trim().is_empty() {
                    self.config.secret = self.examples.secret.clone();
                }
            }
            kind => {
                let Some((pk, sk)) = self.examples.key_pair(kind).cloned() else {
                    return;
                };
                if self.config.public_key.is_blank() || self.is_other_example(&self.config.public_key, &pk) {
                    self.config.public_key = pk;
                }
                if self.config.private_key.is_blank() || self.is_other_example(&self.config.private_key, &sk) {
                    self.config.private_key = sk;
                }
            }
        }
    }

    fn is_other_example(&self, key: &Pem, example: &Pem) -> bool {
        key != example && self.examples.is_example_key(key)
    }

    /// Restores the example token, secret and key pair of the current family, or blanks the
    /// token and drops any example material when examples are disabled
    ///
    /// The algorithm is kept. Does not convert.
    pub fn reset(&mut self) {
        self.clear_errors();
        self.config.secret_encoding = SecretEncoding::default();
        if self.load_examples {
            self.token = Token {
                encoded: self.examples.encoded.clone(),
                header: self.examples.header.clone(),
                payload: self.examples.payload.clone(),
            };
            self.config.secret = self.examples.secret.clone();
            if let Some((pk, sk)) = self.examples.key_pair(self.config.kind()).cloned() {
                self.config.public_key = pk;
                self.config.private_key = sk;
            }
        } else {
            self.token = Token::default();
            if self.examples.is_example_key(&self.config.public_key) {
                self.config.public_key = Pem::default();
            }
            if self.examples.is_example_key(&self.config.private_key) {
                self.config.private_key = Pem::default();
            }
            if self.config.secret == self.examples.secret {
                self.config.secret.clear();
            }
        }
    }

    /// Reads the configured key material and populates the key error holders
    pub fn validate_keys(&mut self) -> bool {
        self.engine.validate_keys(&self.config)
    }

    fn clear_errors(&mut self) {
        self.encoded_errors.clear();
        self.header_errors.clear();
        self.payload_errors.clear();
        self.signature_errors.clear();
    }

    fn display(&mut self, json: &Value, segment: &str, kind: Segment) -> String {
        let holder = match kind {
            Segment::Header => &mut self.header_errors,
            Segment::Payload => &mut self.payload_errors,
        };
        holder.check(token::pretty(json)).unwrap_or_else(|| segment.to_string())
    }

    /// Current slots
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Replaces the encoded slot
    pub fn set_encoded(&mut self, encoded: impl Into<String>) {
        self.token.encoded = encoded.into();
    }

    /// Replaces the header slot
    pub fn set_header(&mut self, header: impl Into<String>) {
        self.token.header = header.into();
    }

    /// Replaces the payload slot
    pub fn set_payload(&mut self, payload: impl Into<String>) {
        self.token.payload = payload.into();
    }

    /// Current signature configuration
    pub fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Whether example values are loaded on algorithm change and reset
    pub fn load_examples(&self) -> bool {
        self.load_examples
    }

    /// See [Self::load_examples]
    pub fn set_load_examples(&mut self, load_examples: bool) {
        self.load_examples = load_examples;
    }

    /// No error about the signature is held
    pub fn signature_valid(&self) -> bool {
        !self.signature_errors.is_set()
    }

    /// Error about the encoded token
    pub fn encoded_errors(&self) -> &ErrorHolder {
        &self.encoded_errors
    }

    /// Error about the header
    pub fn header_errors(&self) -> &ErrorHolder {
        &self.header_errors
    }

    /// Error about the payload
    pub fn payload_errors(&self) -> &ErrorHolder {
        &self.payload_errors
    }

    /// Error about the signature
    pub fn signature_errors(&self) -> &ErrorHolder {
        &self.signature_errors
    }

    /// Errors about the secret and the key pair
    pub fn engine(&self) -> &SignatureEngine {
        &self.engine
    }
}

#[derive(Copy, Clone)]
enum Segment {
    Header,
    Payload,
}

fn decode_json(segment: &str) -> JwtToolResult<Value> {
    token::parse_json(&token::decode_segment_text(segment)?)
}

use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::prelude::*;

/// How a [crate::JwtTool] behaves
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    /// Convert automatically after every edit of a text slot
    pub live_conversion: bool,
    /// Quiet period after the last edit before converting or highlighting, in milliseconds
    pub debounce_delay_ms: u64,
    /// Fill blank key material and the slots on reset with [ExampleData]
    pub load_examples: bool,
    /// Which state groups a [ToolSnapshot] captures
    pub persistence: PersistenceSettings,
}

impl ToolSettings {
    /// Default quiet period
    pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 100;

    /// See [Self::debounce_delay_ms]
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            live_conversion: true,
            debounce_delay_ms: Self::DEFAULT_DEBOUNCE_DELAY_MS,
            load_examples: true,
            persistence: PersistenceSettings::default(),
        }
    }
}

/// Which state groups survive in a [ToolSnapshot]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistenceSettings {
    /// Encoded token, header and payload texts
    pub save_inputs: bool,
    /// Algorithm, secret encoding and live conversion toggle
    pub save_configurations: bool,
    /// Secret and key pair
    pub save_secrets: bool,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            save_inputs: true,
            save_configurations: true,
            save_secrets: false,
        }
    }
}

/// Serializable capture of a tool's state, split by kind of property
///
/// A group left out at capture time is left untouched on restore.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSnapshot {
    /// Text slots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<InputsSnapshot>,
    /// Configuration choices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<ConfigurationsSnapshot>,
    /// Key material
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretsSnapshot>,
}

/// Text slots of a [ToolSnapshot]
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputsSnapshot {
    /// Encoded token
    pub encoded: String,
    /// Header JSON
    pub header: String,
    /// Payload JSON
    pub payload: String,
}

/// Configuration choices of a [ToolSnapshot]
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationsSnapshot {
    /// Signature algorithm
    pub algorithm: SignatureAlgorithm,
    /// How the secret is read
    pub secret_encoding: SecretEncoding,
    /// Live conversion toggle
    pub live_conversion: bool,
}

/// Key material of a [ToolSnapshot]
#[derive(Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsSnapshot {
    /// HMAC secret
    #[serde(default)]
    pub secret: String,
    /// Public key
    #[serde(default)]
    pub public_key: Pem,
    /// Private key
    #[serde(default)]
    pub private_key: Pem,
}

impl std::fmt::Debug for SecretsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsSnapshot")
            .field("secret", &"***")
            .field("public_key", &self.public_key)
            .field("private_key", &"***")
            .finish()
    }
}

impl Drop for SecretsSnapshot {
    fn drop(&mut self) {
        self.secret.zeroize();
        self.private_key.zeroize();
    }
}

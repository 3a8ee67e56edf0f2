use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;

use crate::{
    claims::{ClaimSpan, claim_spans, dot_separator_offsets},
    config::{ConfigurationsSnapshot, InputsSnapshot, SecretsSnapshot, ToolSettings, ToolSnapshot},
    convert::{ChangeOrigin, Converter},
    debounce::Debouncer,
    prelude::*,
};

/// Editable surface which had the focus last
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InputSlot {
    /// Compact token
    Encoded,
    /// Header JSON
    Header,
    /// Payload JSON
    Payload,
}

impl InputSlot {
    /// Conversion implied by an edit of this slot
    pub fn change_origin(&self) -> ChangeOrigin {
        match self {
            Self::Encoded => ChangeOrigin::Encoded,
            Self::Header | Self::Payload => ChangeOrigin::HeaderPayload,
        }
    }
}

/// Text ranges worth highlighting, refreshed after edits and conversions
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Highlights {
    /// Byte offsets of the dots in the encoded token
    pub dot_separators: Vec<usize>,
    /// Standard claims of the header
    pub header_claims: Vec<ClaimSpan>,
    /// Standard claims of the payload
    pub payload_claims: Vec<ClaimSpan>,
}

/// One debounce slot per reactive surface
#[derive(Debug)]
struct Timers {
    conversion: Debouncer,
    dot_separators: Debouncer,
    header_claims: Debouncer,
    payload_claims: Debouncer,
}

impl Timers {
    fn new(handle: &Handle, settings: &ToolSettings) -> Self {
        let delay = settings.debounce_delay();
        Self {
            conversion: Debouncer::new(handle.clone(), delay),
            dot_separators: Debouncer::new(handle.clone(), delay),
            header_claims: Debouncer::new(handle.clone(), delay),
            payload_claims: Debouncer::new(handle.clone(), delay),
        }
    }

    fn cancel_all(&mut self) {
        self.conversion.cancel();
        self.dot_separators.cancel();
        self.header_claims.cancel();
        self.payload_claims.cancel();
    }
}

#[derive(Debug)]
struct ToolState {
    this: Weak<Mutex<ToolState>>,
    converter: Converter,
    settings: ToolSettings,
    last_active_input: Option<InputSlot>,
    /// Bumped whenever the pending conversion is replaced or dropped
    generation: u64,
    disposed: bool,
    conversions: u64,
    highlights: Highlights,
    timers: Timers,
}

fn lock(shared: &Mutex<ToolState>) -> MutexGuard<'_, ToolState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ToolState {
    /// Runs `job` on the state once the timer selected by `timer` fires, unless the tool is
    /// gone by then
    fn schedule(&mut self, timer: fn(&mut Timers) -> &mut Debouncer, job: fn(&mut ToolState)) {
        if self.disposed {
            return;
        }
        let this = self.this.clone();
        timer(&mut self.timers).schedule(move || {
            if let Some(shared) = this.upgrade() {
                job(&mut lock(&shared));
            }
        });
    }

    fn schedule_conversion(&mut self, origin: ChangeOrigin) {
        self.cancel_conversion();
        if self.disposed {
            tracing::debug!(?origin, "conversion skipped");
            return;
        }
        let this = self.this.clone();
        let generation = self.generation;
        self.timers.conversion.schedule(move || {
            if let Some(shared) = this.upgrade() {
                let mut state = lock(&shared);
                // aborting cannot stop a job already waiting for the lock
                if state.generation == generation {
                    state.run_conversion(origin);
                }
            }
        });
    }

    fn cancel_conversion(&mut self) {
        self.generation += 1;
        self.timers.conversion.cancel();
    }

    fn run_conversion(&mut self, origin: ChangeOrigin) {
        self.converter.convert(origin);
        self.conversions += 1;
        self.schedule_dot_separators();
        self.schedule_header_claims();
        self.schedule_payload_claims();
    }

    fn schedule_dot_separators(&mut self) {
        self.schedule(
            |t| &mut t.dot_separators,
            |s| s.highlights.dot_separators = dot_separator_offsets(&s.converter.token().encoded),
        );
    }

    fn schedule_header_claims(&mut self) {
        self.schedule(
            |t| &mut t.header_claims,
            |s| s.highlights.header_claims = claim_spans(&s.converter.token().header),
        );
    }

    fn schedule_payload_claims(&mut self) {
        self.schedule(
            |t| &mut t.payload_claims,
            |s| s.highlights.payload_claims = claim_spans(&s.converter.token().payload),
        );
    }

    fn text_changed(&mut self, slot: InputSlot) {
        self.last_active_input = Some(slot);
        if self.settings.live_conversion {
            self.schedule_conversion(slot.change_origin());
        }
        match slot {
            InputSlot::Encoded => self.schedule_dot_separators(),
            InputSlot::Header => self.schedule_header_claims(),
            InputSlot::Payload => self.schedule_payload_claims(),
        }
    }
}

/// JWT decoder and encoder reacting to edits of its text slots and signature configuration
///
/// Edits schedule a conversion on a tokio runtime after a quiet period, so that a burst of edits
/// converts once with the last content. Highlights are refreshed the same way on timers of their
/// own. Must be created within, or given a [Handle] to, a tokio runtime with time enabled.
///
/// ```no_run
/// # async fn run() {
/// use jwt_workbench::prelude::*;
///
/// let tool = JwtTool::new(tokio::runtime::Handle::current(), ToolSettings::default(), ExampleData::bundled());
/// tool.on_encoded_text_changed(SAMPLE_TOKEN);
/// tokio::time::sleep(std::time::Duration::from_millis(150)).await;
/// assert!(tool.signature_valid());
/// # }
/// ```
#[derive(Debug)]
pub struct JwtTool {
    shared: Arc<Mutex<ToolState>>,
}

impl JwtTool {
    /// A tool showing the example token when `settings.load_examples` is set, blank otherwise
    pub fn new(handle: Handle, settings: ToolSettings, examples: ExampleData) -> Self {
        Self::with_config(handle, settings, examples, SignatureConfig::default())
    }

    /// Same as [Self::new] with an initial signature configuration
    pub fn with_config(handle: Handle, settings: ToolSettings, examples: ExampleData, config: SignatureConfig) -> Self {
        let shared = Arc::new_cyclic(|this| {
            let mut converter = Converter::new(config, examples, settings.load_examples);
            if settings.load_examples {
                converter.reset();
            }
            converter.validate_keys();
            Mutex::new(ToolState {
                this: this.clone(),
                converter,
                timers: Timers::new(&handle, &settings),
                settings,
                last_active_input: None,
                generation: 0,
                disposed: false,
                conversions: 0,
                highlights: Highlights::default(),
            })
        });
        {
            let mut state = lock(&shared);
            state.schedule_dot_separators();
            state.schedule_header_claims();
            state.schedule_payload_claims();
        }
        Self { shared }
    }

    fn state(&self) -> MutexGuard<'_, ToolState> {
        lock(&self.shared)
    }

    /// The compact token was edited
    pub fn on_encoded_text_changed(&self, text: impl Into<String>) {
        let mut state = self.state();
        state.converter.set_encoded(text);
        state.text_changed(InputSlot::Encoded);
    }

    /// The header JSON was edited
    pub fn on_header_text_changed(&self, text: impl Into<String>) {
        let mut state = self.state();
        state.converter.set_header(text);
        state.text_changed(InputSlot::Header);
    }

    /// The payload JSON was edited
    pub fn on_payload_text_changed(&self, text: impl Into<String>) {
        let mut state = self.state();
        state.converter.set_payload(text);
        state.text_changed(InputSlot::Payload);
    }

    /// The algorithm, secret, secret encoding or a key was edited
    ///
    /// Converts whether live conversion is on or not.
    pub fn on_signature_config_changed(&self, config: SignatureConfig) {
        let mut state = self.state();
        state.converter.set_config(config);
        state.schedule_conversion(ChangeOrigin::SignatureConfiguration);
    }

    /// Decodes right away, dropping any scheduled conversion
    pub fn decode_now(&self) {
        let mut state = self.state();
        state.cancel_conversion();
        state.run_conversion(ChangeOrigin::Encoded);
    }

    /// Writes the algorithm into the header and encodes right away, dropping any scheduled
    /// conversion
    pub fn encode_now(&self) {
        let mut state = self.state();
        state.cancel_conversion();
        state.run_conversion(ChangeOrigin::SignatureConfiguration);
    }

    /// Switching live conversion on converts once from the last active slot
    pub fn set_live_conversion(&self, live_conversion: bool) {
        let mut state = self.state();
        let switched_on = live_conversion && !state.settings.live_conversion;
        state.settings.live_conversion = live_conversion;
        if !switched_on {
            return;
        }
        match state.last_active_input {
            Some(InputSlot::Encoded) => state.schedule_conversion(ChangeOrigin::Encoded),
            Some(InputSlot::Header | InputSlot::Payload) => {
                state.schedule_conversion(ChangeOrigin::SignatureConfiguration)
            }
            None => {}
        }
    }

    /// Records the slot which gained the focus
    pub fn focus(&self, slot: InputSlot) {
        self.state().last_active_input = Some(slot);
    }

    /// Restores example or blank slots and key material, then decodes the restored token after
    /// the quiet period
    ///
    /// The pending conversion is dropped and none runs while restoring, the state being locked
    /// throughout. See [Converter::reset].
    pub fn reset_to_defaults(&self, load_examples: bool) {
        let mut state = self.state();
        state.cancel_conversion();
        state.settings.load_examples = load_examples;
        state.converter.set_load_examples(load_examples);
        state.converter.reset();
        tracing::debug!(load_examples, "reset to defaults");
        state.schedule_conversion(ChangeOrigin::Encoded);
    }

    /// Captures the groups enabled in the persistence settings
    pub fn snapshot(&self) -> ToolSnapshot {
        let state = self.state();
        let persistence = state.settings.persistence;
        let token = state.converter.token();
        let config = state.converter.config();
        ToolSnapshot {
            inputs: persistence.save_inputs.then(|| InputsSnapshot {
                encoded: token.encoded.clone(),
                header: token.header.clone(),
                payload: token.payload.clone(),
            }),
            configurations: persistence.save_configurations.then(|| ConfigurationsSnapshot {
                algorithm: config.algorithm,
                secret_encoding: config.secret_encoding,
                live_conversion: state.settings.live_conversion,
            }),
            secrets: persistence.save_secrets.then(|| {
                let mut secrets = SecretsSnapshot::default();
                secrets.secret = config.secret.clone();
                secrets.public_key = config.public_key.clone();
                secrets.private_key = config.private_key.clone();
                secrets
            }),
        }
    }

    /// Applies the groups present in `snapshot`, without converting
    pub fn restore(&self, snapshot: &ToolSnapshot) {
        let mut state = self.state();
        state.cancel_conversion();
        if let Some(inputs) = &snapshot.inputs {
            state.converter.set_encoded(inputs.encoded.clone());
            state.converter.set_header(inputs.header.clone());
            state.converter.set_payload(inputs.payload.clone());
        }
        if let Some(configurations) = &snapshot.configurations {
            let mut config = state.converter.config().clone();
            config.algorithm = configurations.algorithm;
            config.secret_encoding = configurations.secret_encoding;
            state.converter.set_config(config);
            state.settings.live_conversion = configurations.live_conversion;
        }
        if let Some(secrets) = &snapshot.secrets {
            let mut config = state.converter.config().clone();
            config.secret = secrets.secret.clone();
            config.public_key = secrets.public_key.clone();
            config.private_key = secrets.private_key.clone();
            state.converter.set_config(config);
        }
        state.converter.validate_keys();
        state.schedule_dot_separators();
        state.schedule_header_claims();
        state.schedule_payload_claims();
    }

    /// Cancels every pending timer. Later edits still update the slots but never convert.
    pub fn dispose(&self) {
        let mut state = self.state();
        state.disposed = true;
        state.generation += 1;
        state.timers.cancel_all();
    }

    /// Compact token
    pub fn encoded_text(&self) -> String {
        self.state().converter.token().encoded.clone()
    }

    /// Header JSON
    pub fn header_text(&self) -> String {
        self.state().converter.token().header.clone()
    }

    /// Payload JSON
    pub fn payload_text(&self) -> String {
        self.state().converter.token().payload.clone()
    }

    /// Current signature configuration
    pub fn signature_config(&self) -> SignatureConfig {
        self.state().converter.config().clone()
    }

    /// Current settings
    pub fn settings(&self) -> ToolSettings {
        self.state().settings.clone()
    }

    /// No error about the signature is held
    pub fn signature_valid(&self) -> bool {
        self.state().converter.signature_valid()
    }

    /// Error about the encoded token
    pub fn encoded_error(&self) -> Option<String> {
        self.state().converter.encoded_errors().message()
    }

    /// Error about the header
    pub fn header_error(&self) -> Option<String> {
        self.state().converter.header_errors().message()
    }

    /// Error about the payload
    pub fn payload_error(&self) -> Option<String> {
        self.state().converter.payload_errors().message()
    }

    /// Error about the signature
    pub fn signature_error(&self) -> Option<String> {
        self.state().converter.signature_errors().message()
    }

    /// Error about the HMAC secret
    pub fn secret_error(&self) -> Option<String> {
        self.state().converter.engine().secret_errors().message()
    }

    /// Error about the public key
    pub fn public_key_error(&self) -> Option<String> {
        self.state().converter.engine().public_key_errors().message()
    }

    /// Error about the private key
    pub fn private_key_error(&self) -> Option<String> {
        self.state().converter.engine().private_key_errors().message()
    }

    /// Number of conversion passes run so far
    pub fn conversion_count(&self) -> u64 {
        self.state().conversions
    }

    /// Whether a conversion is scheduled and has not completed yet
    pub fn is_conversion_pending(&self) -> bool {
        self.state().timers.conversion.is_pending()
    }

    /// Highlights as of their last refresh
    pub fn highlights(&self) -> Highlights {
        self.state().highlights.clone()
    }

    /// Slot which had the focus last
    pub fn last_active_input(&self) -> Option<InputSlot> {
        self.state().last_active_input
    }
}

impl Drop for JwtTool {
    fn drop(&mut self) {
        self.dispose();
    }
}

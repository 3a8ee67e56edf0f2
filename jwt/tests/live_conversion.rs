use std::time::Duration;

use jwt_workbench::prelude::*;
use tokio::runtime::Handle;

const QUIET: Duration = Duration::from_millis(150);

fn settings(live_conversion: bool) -> ToolSettings {
    ToolSettings {
        live_conversion,
        load_examples: false,
        ..Default::default()
    }
}

fn hmac_tool(live_conversion: bool) -> JwtTool {
    let config = SignatureConfig::hmac(SignatureAlgorithm::HS256, SAMPLE_SECRET);
    JwtTool::with_config(Handle::current(), settings(live_conversion), ExampleData::bundled(), config)
}

fn token_with_subject(subject: &str) -> String {
    let header = r#"{"alg":"HS256"}"#;
    let converter = &mut Converter::new(
        SignatureConfig::hmac(SignatureAlgorithm::HS256, SAMPLE_SECRET),
        ExampleData::bundled(),
        false,
    );
    converter.set_header(header);
    converter.set_payload(format!(r#"{{"sub":"{subject}"}}"#));
    converter.convert(ChangeOrigin::HeaderPayload);
    converter.token().encoded.clone()
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_should_convert_once_with_the_last_content() {
    let tool = hmac_tool(true);
    for i in 0..5 {
        tool.on_encoded_text_changed(token_with_subject(&format!("user-{i}")));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(tool.conversion_count(), 0);
    assert!(tool.is_conversion_pending());

    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 1);
    assert!(tool.payload_text().contains("user-4"));
    assert!(tool.signature_valid());
    assert_eq!(tool.signature_error(), None);
}

#[tokio::test(start_paused = true)]
async fn manual_mode_should_wait_for_explicit_trigger() {
    let tool = hmac_tool(false);
    tool.on_encoded_text_changed(SAMPLE_TOKEN);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 0);
    assert_eq!(tool.header_text(), "");

    tool.decode_now();
    assert_eq!(tool.conversion_count(), 1);
    assert!(tool.signature_valid());
    assert!(tool.header_text().contains("\"typ\": \"JWT\""));
}

#[tokio::test(start_paused = true)]
async fn encode_now_should_write_alg_and_sign() {
    let tool = hmac_tool(false);
    tool.on_header_text_changed(r#"{"typ":"JWT"}"#);
    tool.on_payload_text_changed(r#"{"sub":"123"}"#);
    tool.encode_now();

    assert_eq!(tool.header_text(), "{\n  \"typ\": \"JWT\",\n  \"alg\": \"HS256\"\n}");
    assert!(tool.encoded_text().starts_with("ewogICJ0eXAiOiAiSldUIiwKICAiYWxnIjogIkhTMjU2Igp9."));
    assert!(tool.signature_valid());
}

#[tokio::test(start_paused = true)]
async fn switching_to_live_should_convert_from_last_active_slot() {
    let tool = hmac_tool(false);
    tool.on_payload_text_changed(r#"{"sub":"123"}"#);
    tool.on_header_text_changed(r#"{"alg":"HS512"}"#);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 0);
    assert_eq!(tool.last_active_input(), Some(InputSlot::Header));

    tool.set_live_conversion(true);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 1);
    // the configured algorithm wins over the edited header
    assert_eq!(tool.signature_config().algorithm, SignatureAlgorithm::HS256);
    assert!(tool.header_text().contains("\"alg\": \"HS256\""));
    assert_eq!(tool.encoded_text().split('.').count(), 3);

    // already live: nothing to catch up with
    tool.set_live_conversion(true);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn focus_alone_should_pick_the_direction() {
    let tool = hmac_tool(false);
    tool.on_encoded_text_changed(SAMPLE_TOKEN);
    tool.focus(InputSlot::Encoded);
    tool.set_live_conversion(true);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 1);
    assert!(tool.payload_text().contains("John Doe"));
}

#[tokio::test(start_paused = true)]
async fn config_edits_should_convert_even_in_manual_mode() {
    let tool = hmac_tool(false);
    tool.on_header_text_changed(r#"{"alg":"HS256"}"#);
    tool.on_payload_text_changed("{}");

    let mut config = tool.signature_config();
    config.secret = "other".to_string();
    tool.on_signature_config_changed(config);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 1);
    assert!(!tool.encoded_text().is_empty());
}

#[tokio::test(start_paused = true)]
async fn invalid_keys_should_surface_per_key_errors() {
    let tool = hmac_tool(true);
    tool.on_header_text_changed(r#"{"alg":"RS256"}"#);
    tool.on_payload_text_changed("{}");
    tool.on_signature_config_changed(SignatureConfig::key_pair(SignatureAlgorithm::RS256, SAMPLE_RSA_PUBLIC_KEY, ""));
    tokio::time::sleep(QUIET).await;

    assert_eq!(tool.encoded_text(), "");
    assert_eq!(
        tool.signature_error().as_deref(),
        Some("Invalid signature algorithm configuration")
    );
    assert_eq!(tool.public_key_error(), None);
    assert_eq!(tool.private_key_error().as_deref(), Some("A private key must be provided"));
}

#[tokio::test(start_paused = true)]
async fn reset_should_restore_and_decode_examples() {
    let tool = hmac_tool(true);
    tool.on_encoded_text_changed("garbage");
    tool.reset_to_defaults(true);
    tokio::time::sleep(QUIET).await;

    assert_eq!(tool.conversion_count(), 1);
    assert_eq!(tool.encoded_text(), SAMPLE_TOKEN);
    assert!(tool.signature_valid());
    assert!(tool.header_error().is_none());
    assert!(tool.payload_error().is_none());
    assert!(tool.encoded_error().is_none());
}

#[tokio::test(start_paused = true)]
async fn reset_without_examples_should_blank_everything() {
    let tool = JwtTool::new(Handle::current(), ToolSettings::default(), ExampleData::bundled());
    assert_eq!(tool.encoded_text(), SAMPLE_TOKEN);
    assert_eq!(tool.signature_config().secret, SAMPLE_SECRET);

    tool.reset_to_defaults(false);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.encoded_text(), "");
    assert_eq!(tool.header_text(), "");
    assert_eq!(tool.signature_config().secret, "");
    assert_eq!(
        tool.signature_error().as_deref(),
        Some("Encoded JWT does not have a signature part")
    );
}

#[tokio::test(start_paused = true)]
async fn dispose_should_cancel_pending_conversion() {
    let tool = hmac_tool(true);
    tool.on_encoded_text_changed(SAMPLE_TOKEN);
    tool.dispose();
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 0);

    tool.on_encoded_text_changed(SAMPLE_TOKEN);
    tokio::time::sleep(QUIET).await;
    assert_eq!(tool.conversion_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn highlights_should_follow_conversions() {
    let tool = hmac_tool(true);
    tool.on_encoded_text_changed(SAMPLE_TOKEN);
    tokio::time::sleep(QUIET * 2).await;

    let highlights = tool.highlights();
    let dots = SAMPLE_TOKEN.match_indices('.').map(|(i, _)| i).collect::<Vec<_>>();
    assert_eq!(highlights.dot_separators, dots);
    assert_eq!(
        highlights.header_claims.iter().map(|c| c.claim).collect::<Vec<_>>(),
        vec![StandardClaim::Algorithm]
    );
    assert_eq!(
        highlights.payload_claims.iter().map(|c| c.claim).collect::<Vec<_>>(),
        vec![StandardClaim::JwtId, StandardClaim::Subject, StandardClaim::IssuedAtTime]
    );
}

#[tokio::test(start_paused = true)]
async fn snapshot_should_honor_persistence_settings() {
    let tool = hmac_tool(true);
    tool.on_encoded_text_changed(SAMPLE_TOKEN);
    tokio::time::sleep(QUIET).await;

    let snapshot = tool.snapshot();
    assert!(snapshot.inputs.is_some());
    assert!(snapshot.configurations.is_some());
    assert!(snapshot.secrets.is_none());

    let other = JwtTool::new(Handle::current(), settings(false), ExampleData::bundled());
    other.restore(&snapshot);
    assert_eq!(other.encoded_text(), SAMPLE_TOKEN);
    assert_eq!(other.header_text(), tool.header_text());
    assert!(other.settings().live_conversion);
    assert_eq!(other.signature_config().secret, "");
    assert_eq!(other.conversion_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn restore_should_apply_secrets_when_saved() {
    let mut settings = settings(true);
    settings.persistence.save_secrets = true;
    let config = SignatureConfig::key_pair(SignatureAlgorithm::ES256, SAMPLE_EC_PUBLIC_KEY, SAMPLE_EC_PRIVATE_KEY);
    let tool = JwtTool::with_config(Handle::current(), settings, ExampleData::bundled(), config);

    let snapshot = tool.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let snapshot = serde_json::from_str::<ToolSnapshot>(&json).unwrap();

    let other = hmac_tool(true);
    other.restore(&snapshot);
    let config = other.signature_config();
    assert_eq!(config.algorithm, SignatureAlgorithm::ES256);
    assert_eq!(config.private_key.as_str(), SAMPLE_EC_PRIVATE_KEY);
    assert_eq!(other.public_key_error(), None);
}

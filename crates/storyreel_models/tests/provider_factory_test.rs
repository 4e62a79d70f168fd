//! Provider selection without network access.

use storyreel_interface::CompletionProvider;
use storyreel_models::{ProviderConfig, build_provider};

#[tokio::test]
async fn offline_provider_composes_locally() {
    let provider = build_provider("offline", &ProviderConfig::default()).unwrap();
    assert_eq!(provider.provider_name(), "offline");

    let text = provider
        .complete("Header\n\n[ACTION]\nThe light becomes a fairy.\n\n[TECHNICAL]\n4K, 16:9")
        .await
        .unwrap();
    assert_eq!(text, "The light becomes a fairy. 4K, 16:9.");
}

#[test]
fn missing_key_falls_back_to_offline() {
    let config = ProviderConfig {
        api_key_env: Some("STORYREEL_TEST_KEY_THAT_IS_NEVER_SET".into()),
        ..ProviderConfig::default()
    };
    let provider = build_provider("groq", &config).unwrap();
    assert_eq!(provider.provider_name(), "offline");
}

#[test]
fn unknown_provider_is_rejected() {
    let Err(err) = build_provider("claude", &ProviderConfig::default()) else {
        panic!("Expected unknown provider to be rejected");
    };
    assert!(err.to_string().contains("claude"));
    assert!(err.to_string().contains("gemini"));
}

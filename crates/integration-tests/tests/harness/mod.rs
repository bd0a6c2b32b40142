#![allow(dead_code)]

pub mod mock_responses;

use relay_config::OpenAiConfig;

use self::mock_responses::MockResponses;

/// Model name the tests configure
pub const MODEL: &str = "gpt-mock";

/// Config pointing the adapter at a running mock
pub fn openai_config(mock: &MockResponses) -> OpenAiConfig {
    OpenAiConfig::new(MODEL)
        .with_api_key("sk-test")
        .with_base_url(url::Url::parse(&mock.base_url()).unwrap())
}

/// Wrap a JSON value as an object map
pub fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

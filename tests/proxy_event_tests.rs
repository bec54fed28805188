use std::io::Write;
use std::sync::Arc;

use chat_relay::connector::api::controller::InvokeController;
use chat_relay::connector::api::{handle_event, Container, ContainerConfig};
use chat_relay::{MockInferenceClient, ModelProfile, ProfileCatalog};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn container(completion: &str) -> Container {
    let profile = ModelProfile::claude_instant();
    let client = MockInferenceClient::new(profile.response_path.clone()).with_completion(completion);
    Container::with_client(profile, Arc::new(client))
}

#[tokio::test]
async fn proxy_event_success_matches_handler_contract() {
    let container = container(" Hi! How can I help you today? ");
    let event = json!({
        "httpMethod": "GET",
        "path": "/",
        "queryStringParameters": {"q": "hello"}
    });

    let response = handle_event(&container, &event).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["Content-Type"], "application/json");
    assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body, json!({"reply": "Hi! How can I help you today?"}));
}

#[tokio::test]
async fn proxy_event_without_query_string_is_500() {
    let container = container("unused");
    let event = json!({"httpMethod": "GET", "queryStringParameters": null});

    let response = handle_event(&container, &event).await;

    assert_eq!(response.status_code, 500);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("'q'"));
}

#[tokio::test]
async fn invoke_controller_reads_event_file() {
    let container = container("Sure.");
    let mut file = NamedTempFile::new().expect("tempfile");
    write!(file, r#"{{"queryStringParameters": {{"q": "ping"}}}}"#).unwrap();

    let out = InvokeController::new(&container)
        .invoke(Some(file.path().to_path_buf()))
        .await
        .expect("invoke");

    let response: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], r#"{"reply":"Sure."}"#);
}

#[tokio::test]
async fn invoke_controller_rejects_non_json_event() {
    let container = container("unused");
    let err = InvokeController::new(&container)
        .invoke_raw("not json")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not valid JSON"));
}

#[test]
fn profiles_file_overrides_and_extends_builtins() {
    let mut file = NamedTempFile::new().expect("tempfile");
    let profiles = json!([
        {
            "name": "claude-instant",
            "model_id": "anthropic.claude-v2:1",
            "prompt_template": "\n\nHuman: {message}\n\nAssistant:",
            "generation": {"max_tokens": 300, "temperature": 0.2, "top_p": 1.0,
                           "stop_sequences": ["\n\nHuman:"]},
            "schema": "anthropic_text",
            "response_path": "completion",
            "cleanup": "trim"
        },
        {
            "name": "titan-lite",
            "model_id": "amazon.titan-text-lite-v1",
            "prompt_template": "User: {message}\nBot:",
            "generation": {"max_tokens": 100, "temperature": 0.5, "top_p": 0.9},
            "schema": "titan_text",
            "response_path": "results.0.outputText"
        }
    ]);
    write!(file, "{}", profiles).unwrap();

    let catalog = ProfileCatalog::load(Some(file.path())).expect("load");
    assert_eq!(catalog.profiles().len(), 5);
    assert_eq!(
        catalog.get("claude-instant").unwrap().model_id,
        "anthropic.claude-v2:1"
    );
    assert_eq!(
        catalog.get("titan-lite").unwrap().model_id,
        "amazon.titan-text-lite-v1"
    );

    let container = Container::new(ContainerConfig {
        profile: "titan-lite".into(),
        profiles_file: Some(file.path().to_path_buf()),
        mock_inference: true,
        ..ContainerConfig::default()
    })
    .expect("container");
    assert_eq!(container.profile().model_id, "amazon.titan-text-lite-v1");
}

#[test]
fn missing_profiles_file_is_a_startup_error() {
    let result = Container::new(ContainerConfig {
        profiles_file: Some("/definitely/not/here.json".into()),
        mock_inference: true,
        ..ContainerConfig::default()
    });
    let err = result.err().expect("should fail");
    assert!(err.to_string().contains("cannot read profiles file"));
}

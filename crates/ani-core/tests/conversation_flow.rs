//! Integration tests for the conversation cycle against a mock service.

use ani_core::{
    AvatarBackend, CompanionConfig, CompanionError, CompanionResult, ConversationBackend,
    ConversationController, LovableClient, SubmitOutcome,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingAvatar {
    spoken: Mutex<Vec<String>>,
}

impl AvatarBackend for RecordingAvatar {
    fn speak(&self, audio_url: &str) -> CompanionResult<()> {
        self.spoken.lock().unwrap().push(audio_url.to_string());
        Ok(())
    }

    fn model_src(&self) -> &str {
        "model.glb"
    }
}

fn test_client(server: &MockServer) -> LovableClient {
    LovableClient::new(CompanionConfig::new("test-key", "char-1", server.uri()))
}

#[tokio::test]
async fn send_message_posts_expected_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/characters/char-1/send-message"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "text": "hello", "user_id": "web-user-777" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "audio_url": "https://x/a.mp3" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = test_client(&server).send_message("hello").await.unwrap();
    assert_eq!(reply.audio(), Some("https://x/a.mp3"));
}

#[tokio::test]
async fn missing_audio_url_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "text only" })))
        .mount(&server)
        .await;

    let reply = test_client(&server).send_message("hello").await.unwrap();
    assert!(reply.audio().is_none());
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = test_client(&server).send_message("hello").await.unwrap_err();
    match err {
        CompanionError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server).send_message("hello").await.unwrap_err();
    assert!(matches!(err, CompanionError::Parse(_)));
}

#[tokio::test]
async fn hello_round_trip_ends_in_idle_state_with_audio_spoken() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/characters/char-1/send-message"))
        .and(body_json(json!({ "text": "hello", "user_id": "web-user-777" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "audio_url": "https://cdn/reply.mp3" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend: Arc<dyn ConversationBackend> = Arc::new(test_client(&server));
    let avatar = Arc::new(RecordingAvatar::default());
    let controller = ConversationController::new(
        "model.glb",
        backend,
        Arc::clone(&avatar) as Arc<dyn AvatarBackend>,
    );

    controller.set_input("hello");
    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Spoken);
    assert_eq!(controller.input(), "");
    assert!(!controller.is_loading());
    assert_eq!(controller.ai_audio().as_deref(), Some("https://cdn/reply.mp3"));
    assert_eq!(
        avatar.spoken.lock().unwrap().as_slice(),
        &["https://cdn/reply.mp3".to_string()]
    );
}

#[tokio::test]
async fn network_failure_recovers_without_audio() {
    // Point at a server that is already gone.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let backend: Arc<dyn ConversationBackend> =
        Arc::new(LovableClient::new(CompanionConfig::new("test-key", "char-1", uri)));
    let avatar = Arc::new(RecordingAvatar::default());
    let controller = ConversationController::new(
        "model.glb",
        backend,
        Arc::clone(&avatar) as Arc<dyn AvatarBackend>,
    );

    controller.set_input("hello");
    assert_eq!(controller.submit().await, SubmitOutcome::Failed);

    assert!(!controller.is_loading());
    assert_eq!(controller.input(), "");
    assert!(controller.ai_audio().is_none());
    assert!(avatar.spoken.lock().unwrap().is_empty());
}

//! Remote Conversation Service client.
//!
//! One operation: send the user's text to the configured character and get
//! back a spoken-audio locator. The service owns voice synthesis; this side
//! only carries the text over and the `audio_url` back.

use crate::config::CompanionConfig;
use crate::error::{CompanionError, CompanionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reply from the conversation service. `audio_url` may be absent; the
/// controller treats that as a soft failure, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationReply {
    /// Locator of the spoken reply, when the service produced one.
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl ConversationReply {
    /// The audio locator, filtered to non-empty values.
    pub fn audio(&self) -> Option<&str> {
        self.audio_url.as_deref().filter(|s| !s.is_empty())
    }
}

/// Backend that turns user text into a conversation reply. Implement for the
/// hosted service or a local stand-in.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Send one message; the reply optionally carries an audio locator.
    async fn send_message(&self, text: &str) -> CompanionResult<ConversationReply>;
}

/// Placeholder backend: accepts every message and returns no audio. Use for
/// offline demos and for testing the controller without a network.
#[derive(Debug, Default)]
pub struct PlaceholderConversation;

#[async_trait]
impl ConversationBackend for PlaceholderConversation {
    async fn send_message(&self, _text: &str) -> CompanionResult<ConversationReply> {
        Ok(ConversationReply::default())
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    text: &'a str,
    user_id: &'a str,
}

/// Hosted conversation service client.
///
/// `POST <base-url>/v1/characters/<character-id>/send-message` with a bearer
/// key. No timeout is configured: the request settles when the network stack
/// says so, and the controller's in-flight guard holds until then.
pub struct LovableClient {
    config: CompanionConfig,
    client: reqwest::Client,
}

impl LovableClient {
    pub fn new(config: CompanionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/v1/characters/{}/send-message",
            self.config.base_url.trim_end_matches('/'),
            self.config.character_id
        )
    }
}

#[async_trait]
impl ConversationBackend for LovableClient {
    async fn send_message(&self, text: &str) -> CompanionResult<ConversationReply> {
        let body = SendMessageRequest {
            text,
            user_id: &self.config.user_id,
        };

        let res = self
            .client
            .post(self.send_message_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(CompanionError::Api { status, body });
        }

        let reply: ConversationReply = res
            .json()
            .await
            .map_err(|e| CompanionError::Parse(e.to_string()))?;

        Ok(reply)
    }
}

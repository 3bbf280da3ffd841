//! **Conversation Controller** — one request/response/playback cycle per
//! user submission.
//!
//! Owns exactly four pieces of state: the text being composed, the most
//! recent reply audio locator, the in-flight guard, and the fixed model
//! locator. Playback is an explicit post-update call into the avatar
//! adapter, so ordering stays observable: the locator is stored first, then
//! spoken exactly once.

use crate::avatar::AvatarBackend;
use crate::client::ConversationBackend;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// How a `submit` call settled. Hosts may surface this or ignore it; errors
/// are never propagated, only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input or a request already in flight; nothing happened.
    Ignored,
    /// Reply audio stored and handed to the avatar.
    Spoken,
    /// The service answered but carried no audio locator.
    NoAudio,
    /// Transport or parse failure; logged and swallowed.
    Failed,
}

#[derive(Debug, Default)]
struct ControllerState {
    user_input: String,
    ai_audio: Option<String>,
    is_loading: bool,
}

/// Orchestrates the submit → request → playback cycle. Shareable across UI
/// callbacks; the state lock is never held across an await.
pub struct ConversationController {
    state: Mutex<ControllerState>,
    model_src: String,
    backend: Arc<dyn ConversationBackend>,
    avatar: Arc<dyn AvatarBackend>,
}

impl ConversationController {
    pub fn new(
        model_src: impl Into<String>,
        backend: Arc<dyn ConversationBackend>,
        avatar: Arc<dyn AvatarBackend>,
    ) -> Self {
        Self {
            state: Mutex::new(ControllerState::default()),
            model_src: model_src.into(),
            backend,
            avatar,
        }
    }

    /// Replace the text being composed (one call per keystroke in a UI host).
    pub fn set_input(&self, text: impl Into<String>) {
        self.state.lock().unwrap().user_input = text.into();
    }

    /// Current composed text.
    pub fn input(&self) -> String {
        self.state.lock().unwrap().user_input.clone()
    }

    /// Most recently stored reply audio locator.
    pub fn ai_audio(&self) -> Option<String> {
        self.state.lock().unwrap().ai_audio.clone()
    }

    /// True exactly while one request is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().is_loading
    }

    /// The avatar model locator, fixed at construction.
    pub fn model_src(&self) -> &str {
        &self.model_src
    }

    /// Submit the composed text.
    ///
    /// Blank input or an in-flight request is a no-op that leaves all state
    /// untouched. Otherwise the guard is raised, any previous audio cleared,
    /// and one message sent. On settlement (every non-ignored path) the
    /// guard drops and the input clears.
    pub async fn submit(&self) -> SubmitOutcome {
        let text = {
            let mut st = self.state.lock().unwrap();
            if st.is_loading || st.user_input.trim().is_empty() {
                debug!("submit ignored: blank input or request in flight");
                return SubmitOutcome::Ignored;
            }
            st.is_loading = true;
            st.ai_audio = None;
            st.user_input.clone()
        };

        let outcome = match self.backend.send_message(&text).await {
            Ok(reply) => match reply.audio() {
                Some(url) => {
                    let url = url.to_string();
                    self.state.lock().unwrap().ai_audio = Some(url.clone());
                    if let Err(e) = self.avatar.speak(&url) {
                        warn!("avatar playback failed: {}", e);
                    }
                    SubmitOutcome::Spoken
                }
                None => {
                    warn!("conversation service returned no audio_url");
                    SubmitOutcome::NoAudio
                }
            },
            Err(e) => {
                warn!("conversation request failed: {}", e);
                SubmitOutcome::Failed
            }
        };

        let mut st = self.state.lock().unwrap();
        st.is_loading = false;
        st.user_input.clear();
        outcome
    }
}

//! # Ani Core — companion conversation and playback
//!
//! One cycle per submission: user text goes to the hosted conversation
//! service, the returned spoken-audio locator is stored, and the avatar
//! adapter plays it.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                Conversation Controller                     │
//! │  ┌───────────┐   ┌──────────────────┐   ┌──────────────┐   │
//! │  │ user text │ → │ Conversation     │ → │   Avatar     │   │
//! │  │ (submit)  │   │ Service (HTTP)   │   │  (speak url) │   │
//! │  └───────────┘   └──────────────────┘   └──────────────┘   │
//! │        at most one request in flight (is_loading guard)    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures are logged and swallowed; the controller always settles back to
//! idle with the input cleared.

pub mod avatar;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;

pub use avatar::{AvatarBackend, AvatarProfile, PlaceholderAvatar, VoiceAvatar};
pub use client::{ConversationBackend, ConversationReply, LovableClient, PlaceholderConversation};
pub use config::CompanionConfig;
pub use controller::{ConversationController, SubmitOutcome};
pub use error::{CompanionError, CompanionResult};

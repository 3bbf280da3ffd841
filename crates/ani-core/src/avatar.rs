//! **Avatar playback adapter** — bridge a reply audio locator to the renderer.
//!
//! The 3D rendering itself lives in an external renderer; this side owns the
//! "speak this locator" capability. `VoiceAvatar` fetches the audio resource
//! and plays it through a `rodio::Sink`; a new `speak` while audio is playing
//! clears the queue first (no overlap queueing).

use crate::config::DEFAULT_MODEL_SRC;
use crate::error::{CompanionError, CompanionResult};
use rodio::{OutputStream, Sink, Source};
use std::io::Cursor;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Renderer-facing character setup: model locator plus the presentation
/// hints the renderer consumes alongside the audio.
#[derive(Debug, Clone)]
pub struct AvatarProfile {
    /// Locator of the 3D model, fixed for the lifetime of the avatar.
    pub model_src: String,
    /// Base emotion the renderer holds between replies.
    pub emotion: String,
    /// Whether the renderer applies idle head movement.
    pub head_movement: bool,
}

impl Default for AvatarProfile {
    fn default() -> Self {
        Self {
            model_src: DEFAULT_MODEL_SRC.to_string(),
            emotion: "happy".to_string(),
            head_movement: true,
        }
    }
}

impl AvatarProfile {
    pub fn new(model_src: impl Into<String>) -> Self {
        Self {
            model_src: model_src.into(),
            ..Default::default()
        }
    }
}

/// Playback capability of the avatar. The controller invokes `speak` exactly
/// once per stored audio locator; what happens to audio already playing is
/// the implementation's business.
pub trait AvatarBackend: Send + Sync {
    /// Play the audio resource at `audio_url` with lip-sync/head animation.
    fn speak(&self, audio_url: &str) -> CompanionResult<()>;

    /// The model locator this avatar renders.
    fn model_src(&self) -> &str;
}

/// Placeholder avatar: logs the locator and plays nothing. Use headless or
/// when no audio device is available.
#[derive(Debug, Default)]
pub struct PlaceholderAvatar {
    profile: AvatarProfile,
}

impl PlaceholderAvatar {
    pub fn new(profile: AvatarProfile) -> Self {
        Self { profile }
    }
}

impl AvatarBackend for PlaceholderAvatar {
    fn speak(&self, audio_url: &str) -> CompanionResult<()> {
        info!("PlaceholderAvatar: would speak {}", audio_url);
        Ok(())
    }

    fn model_src(&self) -> &str {
        &self.profile.model_src
    }
}

enum PlaybackCmd {
    Speak(String),
    Stop,
}

/// Speaking avatar: fetches the reply audio and plays it on the default
/// output device. `speak` only hands the locator to a dedicated playback
/// thread: the `rodio` output stream is not `Send` on every platform, and
/// the blocking HTTP client must never run on a tokio worker, so both live
/// on that thread behind a command channel.
pub struct VoiceAvatar {
    profile: AvatarProfile,
    cmd_tx: mpsc::UnboundedSender<PlaybackCmd>,
}

impl VoiceAvatar {
    /// Create against the default output device. Fails when no output
    /// device is available.
    pub fn new(profile: AvatarProfile) -> CompanionResult<Self> {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        std::thread::Builder::new()
            .name("avatar-playback".to_string())
            .spawn(move || {
                let built = OutputStream::try_default()
                    .map_err(|e| e.to_string())
                    .and_then(|(stream, handle)| {
                        Sink::try_new(&handle)
                            .map(|sink| (stream, sink))
                            .map_err(|e| e.to_string())
                    });
                let (_stream, sink) = match built {
                    Ok(parts) => {
                        let _ = ready_tx.send(Ok(()));
                        parts
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let http = reqwest::blocking::Client::new();
                while let Some(cmd) = cmd_rx.blocking_recv() {
                    match cmd {
                        PlaybackCmd::Speak(audio_url) => {
                            let bytes = match fetch_reply_audio(&http, &audio_url) {
                                Ok(b) => b,
                                Err(e) => {
                                    warn!("reply audio fetch failed: {}", e);
                                    continue;
                                }
                            };
                            if bytes.is_empty() {
                                continue;
                            }
                            match rodio::Decoder::new(Cursor::new(bytes)) {
                                Ok(source) => {
                                    sink.stop();
                                    sink.append(source.convert_samples::<f32>());
                                }
                                Err(e) => warn!("reply audio decode failed: {}", e),
                            }
                        }
                        PlaybackCmd::Stop => sink.stop(),
                    }
                }
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(CompanionError::Playback(e)),
            Err(_) => {
                return Err(CompanionError::Playback(
                    "playback thread exited before init".to_string(),
                ))
            }
        }

        info!(
            model_src = %profile.model_src,
            emotion = %profile.emotion,
            "VoiceAvatar: sink ready"
        );
        Ok(Self { profile, cmd_tx })
    }

    /// Stop playback immediately and clear the queue.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(PlaybackCmd::Stop);
    }
}

impl AvatarBackend for VoiceAvatar {
    fn speak(&self, audio_url: &str) -> CompanionResult<()> {
        self.cmd_tx
            .send(PlaybackCmd::Speak(audio_url.to_string()))
            .map_err(|_| CompanionError::Playback("playback thread is gone".to_string()))
    }

    fn model_src(&self) -> &str {
        &self.profile.model_src
    }
}

fn fetch_reply_audio(
    http: &reqwest::blocking::Client,
    audio_url: &str,
) -> CompanionResult<Vec<u8>> {
    let res = http
        .get(audio_url)
        .send()
        .map_err(|e| CompanionError::AudioFetch(e.to_string()))?;
    if !res.status().is_success() {
        return Err(CompanionError::AudioFetch(format!(
            "audio resource returned {}",
            res.status()
        )));
    }
    let bytes = res
        .bytes()
        .map_err(|e| CompanionError::AudioFetch(e.to_string()))?;
    Ok(bytes.to_vec())
}

//! Ani CLI: type a line, the companion replies out loud.
//!
//! Usage:
//!   cargo run -p ani-cli [-- --offline] [--placeholder-audio] [--model-src URL]
//!
//! Requires LOVABLE_API_KEY and LOVABLE_CHARACTER_ID in `.env` (or the
//! environment) unless running --offline.

use ani_core::{
    AvatarBackend, AvatarProfile, CompanionConfig, ConversationBackend, ConversationController,
    LovableClient, PlaceholderAvatar, PlaceholderConversation, SubmitOutcome, VoiceAvatar,
};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut offline = false;
    let mut placeholder_audio = false;
    let mut model_src: Option<String> = None;
    let mut show_help = false;

    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--offline" => offline = true,
            "--placeholder-audio" => placeholder_audio = true,
            "--model-src" => model_src = args.next(),
            "--help" | "-h" => show_help = true,
            _ => {}
        }
    }

    if show_help {
        eprintln!("Ani — terminal companion");
        eprintln!("  --offline             Placeholder conversation backend (no API keys needed)");
        eprintln!("  --placeholder-audio   Log replies instead of playing them (no audio device)");
        eprintln!("  --model-src URL       Override the avatar model locator");
        eprintln!();
        eprintln!("Requires LOVABLE_API_KEY and LOVABLE_CHARACTER_ID unless --offline.");
        return Ok(());
    }

    let config = if offline {
        None
    } else {
        Some(CompanionConfig::from_env()?)
    };

    let backend: Arc<dyn ConversationBackend> = match config {
        Some(ref c) => Arc::new(LovableClient::new(c.clone())),
        None => {
            info!("offline mode: conversation replies carry no audio");
            Arc::new(PlaceholderConversation)
        }
    };

    let model_src = model_src
        .or_else(|| config.as_ref().map(|c| c.model_src.clone()))
        .unwrap_or_else(|| ani_core::config::DEFAULT_MODEL_SRC.to_string());
    let profile = AvatarProfile::new(model_src.clone());

    let avatar: Arc<dyn AvatarBackend> = if placeholder_audio {
        Arc::new(PlaceholderAvatar::new(profile))
    } else {
        match VoiceAvatar::new(profile.clone()) {
            Ok(v) => Arc::new(v),
            Err(e) => {
                warn!("no audio output available ({}), using placeholder avatar", e);
                Arc::new(PlaceholderAvatar::new(profile))
            }
        }
    };

    let controller = ConversationController::new(model_src, backend, avatar);

    println!("Talk to Ani... (Ctrl+D to exit)");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        controller.set_input(line);
        if !controller.input().trim().is_empty() {
            println!("Thinking...");
        }
        match controller.submit().await {
            SubmitOutcome::Spoken => println!("Ani is speaking."),
            SubmitOutcome::NoAudio | SubmitOutcome::Failed => println!("(no reply audio)"),
            SubmitOutcome::Ignored => {}
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

//! Synchronous playback: block until the sound finishes on its own.
//!
//! Usage: cargo run --example play_sound_synced -- <soundfile.mp3>

use std::path::PathBuf;

use anyhow::Result;
use playhound::{Loop, Player};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let file = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("soundfiles/pachelbel_canon_example.mp3"));

    let player = Player::with_defaults()?;
    let sound = player.add_sound(&file)?;

    let duration = player.duration_secs(sound);
    if duration >= 0 {
        tracing::info!("Sound is {}s long", duration);
    }

    player.play(sound, Loop::Once, 0)?;
    player.wait(sound);

    Ok(())
}

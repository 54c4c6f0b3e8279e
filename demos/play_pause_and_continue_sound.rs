//! Pause a running sound and continue it a moment later.
//!
//! Usage: cargo run --example play_pause_and_continue_sound -- <soundfile.mp3>

use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

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

    player.play(sound, Loop::Once, 0)?;
    sleep(Duration::from_secs(2));

    player.pause(sound);
    sleep(Duration::from_secs(2));

    player.resume(sound);
    sleep(Duration::from_secs(10));

    Ok(())
}

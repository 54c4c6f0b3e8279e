//! Fire-and-forget playback: play keeps the calling thread free.
//!
//! Usage: cargo run --example play_single_soundfile_async -- <soundfile.mp3>

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

    // Do ten seconds of "other work" while the sound plays.
    sleep(Duration::from_secs(10));

    Ok(())
}

//! Looping background music with a quieter sound effect layered on top.
//! Each sound is its own player process, so they run concurrently.
//!
//! Usage: cargo run --example play_soundfiles_in_parallel -- <music.mp3> <effect.mp3>

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

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let music = args
        .next()
        .unwrap_or_else(|| PathBuf::from("soundfiles/pachelbel_canon_example.mp3"));
    let effect = args
        .next()
        .unwrap_or_else(|| PathBuf::from("soundfiles/sound_effect.mp3"));

    let player = Player::with_defaults()?;

    let background = player.add_sound(&music)?;
    player.play(background, Loop::Infinite, 0)?;

    sleep(Duration::from_secs(2));

    // The effect overrides the device volume; the music keeps the default.
    let effect = player.add_sound_with(&effect, Some(70), None)?;
    player.play(effect, Loop::Times(2), 0)?;

    sleep(Duration::from_secs(10));

    Ok(())
}

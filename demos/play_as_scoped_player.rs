//! Scoped playback: dropping the player stops every sound it owns, on
//! normal returns, early `?` exits and panics alike.
//!
//! Usage: cargo run --example play_as_scoped_player -- <soundfile.mp3>

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

    {
        let player = Player::with_defaults()?;
        let sound = player.add_sound(&file)?;

        player.play(sound, Loop::Once, 0)?;

        sleep(Duration::from_secs(10));
        // Scope ends here; the player's Drop stops the sound process.
    }

    Ok(())
}

//! Audio playback through supervised external player processes.
//!
//! Every sound is played by its own ffplay process; this crate supplies the
//! control layer on top: spawning, suspending, resuming and terminating
//! those processes, and reconciling player-level and sound-level settings
//! into the concrete command line each spawn uses.
//!
//! ## Architecture
//!
//! ```text
//! Player
//!   ├── PlayerSettings (device defaults, always concrete)
//!   ├── Box<dyn PlayerBackend>  (ffplay: build_args + duration probe)
//!   └── registry: Vec<Sound>    (insertion order, append-only)
//!         └── Sound
//!             ├── SoundSettings (optional overrides, None = inherit)
//!             ├── Option<Child> (the external process, if playing)
//!             └── Loop          (last directive; infinite is not awaitable)
//! ```
//!
//! Playback state is a four-state machine per sound (Idle, Running,
//! Suspended, Exited), where Exited is detected lazily by polling the
//! child. Wrong-state operations log a diagnostic and do nothing; the only
//! hard failures are a missing sound file and a missing player binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use playhound::{Loop, Player};
//!
//! let player = Player::with_defaults()?;
//! let music = player.add_sound("music.mp3")?;
//! let rain = player.add_sound_with("rain.mp3", Some(40), None)?;
//!
//! player.play(music, Loop::Once, 0)?;
//! player.play(rain, Loop::Infinite, 0)?;
//!
//! player.wait(music);
//! // Dropping the player stops every remaining process.
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod player;
mod probe;
mod process;
pub mod settings;
mod sound;

pub use backend::{BackendKind, Ffplay, PlayerBackend};
pub use config::PlayerConfig;
pub use error::{Error, Result};
pub use player::Player;
pub use settings::{
    clamp_and_report, EffectiveSettings, PlayerSettings, SoundSettings, SupportedRange,
};
pub use sound::{Loop, PlaybackState, SoundId};

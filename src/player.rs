use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::backend::{self, PlayerBackend};
use crate::config::PlayerConfig;
use crate::error::{Error, Result};
use crate::probe;
use crate::settings::{PlayerSettings, SoundSettings, SupportedRanges};
use crate::sound::{Loop, PlaybackState, Sound, SoundId};

/// Process supervisor and sound registry.
///
/// A `Player` owns device-level defaults and every sound registered through
/// it. Each playing sound is one external OS process; play/pause/resume/stop
/// map onto spawn and signals, and misuse in the wrong state degrades to a
/// logged no-op rather than an error. Dropping the player stops everything,
/// so no child process outlives its owner on any exit path.
pub struct Player {
    backend: Box<dyn PlayerBackend>,
    ranges: SupportedRanges,
    settings: Mutex<PlayerSettings>,
    sounds: Mutex<Vec<Arc<Mutex<Sound>>>>,
}

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

impl Player {
    /// Create a player from configuration. Fails fast if the config names a
    /// player binary path that does not exist.
    pub fn new(config: PlayerConfig) -> Result<Self> {
        let backend = backend::create(&config)?;
        Ok(Self::with_backend(backend, &config))
    }

    /// Create a player with ffplay defaults and PATH lookup.
    pub fn with_defaults() -> Result<Self> {
        Self::new(PlayerConfig::default())
    }

    /// Create a player around an already-built backend. This is the
    /// extension seam for other external tools (and for tests, which drive
    /// the supervisor with a stub binary instead of a media player).
    pub fn with_backend(backend: Box<dyn PlayerBackend>, config: &PlayerConfig) -> Self {
        let ranges = SupportedRanges {
            volume: config.volume_range,
            speed: config.speed_range,
        };

        let mut settings = PlayerSettings::default();
        if let Some(volume) = config.initial_volume {
            settings.set_volume(volume, ranges.volume);
        }
        if let Some(speed) = config.initial_speed {
            settings.set_speed(speed, ranges.speed);
        }

        Self {
            backend,
            ranges,
            settings: Mutex::new(settings),
            sounds: Mutex::new(Vec::new()),
        }
    }

    pub fn volume(&self) -> i32 {
        self.settings.lock().volume()
    }

    pub fn speed(&self) -> f64 {
        self.settings.lock().speed()
    }

    /// Set the device-level default volume. Out-of-range values are clamped
    /// and reported; returns true iff the input was already in range.
    pub fn set_volume(&self, volume: i32) -> bool {
        self.settings.lock().set_volume(volume, self.ranges.volume)
    }

    /// Set the device-level default speed. Clamp law as for volume.
    pub fn set_speed(&self, speed: f64) -> bool {
        self.settings.lock().set_speed(speed, self.ranges.speed)
    }

    /// Register a sound without overrides; it inherits the player settings.
    pub fn add_sound(&self, file_path: impl AsRef<Path>) -> Result<SoundId> {
        self.add_sound_with(file_path, None, None)
    }

    /// Register a sound with optional volume/speed overrides. The file must
    /// exist. Duration is probed best-effort and stays -1 when unknown.
    pub fn add_sound_with(
        &self,
        file_path: impl AsRef<Path>,
        volume: Option<i32>,
        speed: Option<f64>,
    ) -> Result<SoundId> {
        let file_path = file_path.as_ref();

        let mut settings = SoundSettings::default();
        if let Some(volume) = volume {
            settings.set_volume(volume, self.ranges.volume);
        }
        if let Some(speed) = speed {
            settings.set_speed(speed, self.ranges.speed);
        }

        let mut sound = Sound::new(file_path, settings)?;
        sound.duration_secs = probe::probe_duration(self.backend.as_ref(), file_path);

        let mut sounds = self.sounds.lock();
        sounds.push(Arc::new(Mutex::new(sound)));
        Ok(SoundId(sounds.len() - 1))
    }

    /// Start playback. Any existing process for this sound is reset first,
    /// so calling play twice leaves exactly one live process.
    pub fn play(&self, id: SoundId, looping: Loop, start_offset_sec: i64) -> Result<()> {
        let Some(slot) = self.sound(id) else {
            return Ok(());
        };
        let mut sound = slot.lock();

        sound.reset();

        let effective = sound.settings.effective(&self.settings.lock());
        let args = self
            .backend
            .build_args(&effective, looping, start_offset_sec, &sound.file_path);

        let child = Command::new(self.backend.executable())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    Error::PlayerNotFound {
                        path: self.backend.executable().to_path_buf(),
                    }
                } else {
                    Error::SpawnFailed {
                        path: sound.file_path.clone(),
                        source: err,
                    }
                }
            })?;

        tracing::info!("Play '{}'", sound.file_path.display());
        sound.attach(child, looping);
        Ok(())
    }

    /// Suspend a running sound's process. Legal only from Running; other
    /// states report a diagnostic, and a process that died on its own is
    /// reconciled back to Idle.
    pub fn pause(&self, id: SoundId) {
        let Some(slot) = self.sound(id) else {
            return;
        };
        let mut sound = slot.lock();

        match sound.state() {
            PlaybackState::Idle => {
                tracing::warn!(
                    "Can't pause '{}': sound is not playing",
                    sound.file_path.display()
                );
            }
            PlaybackState::Running => match sound.suspend() {
                Ok(()) => tracing::info!("Pause '{}'", sound.file_path.display()),
                Err(err) if err.kind() == std::io::ErrorKind::Unsupported => {
                    tracing::warn!(
                        "Can't pause '{}': {}",
                        sound.file_path.display(),
                        err
                    );
                }
                Err(err) => {
                    tracing::debug!(
                        "Suspend failed for '{}' ({}); clearing playback state",
                        sound.file_path.display(),
                        err
                    );
                    sound.reset();
                }
            },
            PlaybackState::Suspended => {
                tracing::warn!(
                    "Can't pause '{}': sound is already paused",
                    sound.file_path.display()
                );
            }
            PlaybackState::Exited => self.reconcile_exited(&mut sound),
        }
    }

    /// Resume a suspended sound's process. Legal only from Suspended; other
    /// states report a diagnostic, and a dead process is reconciled.
    pub fn resume(&self, id: SoundId) {
        let Some(slot) = self.sound(id) else {
            return;
        };
        let mut sound = slot.lock();

        match sound.state() {
            PlaybackState::Idle => {
                tracing::warn!(
                    "Can't continue '{}': sound is not paused",
                    sound.file_path.display()
                );
            }
            PlaybackState::Running => {
                tracing::warn!(
                    "Can't continue '{}': sound is already playing",
                    sound.file_path.display()
                );
            }
            PlaybackState::Suspended => match sound.resume() {
                Ok(()) => tracing::info!("Continue '{}'", sound.file_path.display()),
                Err(err) if err.kind() == std::io::ErrorKind::Unsupported => {
                    tracing::warn!(
                        "Can't continue '{}': {}",
                        sound.file_path.display(),
                        err
                    );
                }
                Err(err) => {
                    tracing::debug!(
                        "Resume failed for '{}' ({}); clearing playback state",
                        sound.file_path.display(),
                        err
                    );
                    sound.reset();
                }
            },
            PlaybackState::Exited => self.reconcile_exited(&mut sound),
        }
    }

    /// Stop a sound and clear its bookkeeping. A sound with no process is
    /// left alone; stopping is never an error.
    pub fn stop(&self, id: SoundId) {
        let Some(slot) = self.sound(id) else {
            return;
        };
        Self::stop_sound(&mut slot.lock());
    }

    /// Stop every registered sound in insertion order. Also the teardown
    /// path: [`Drop`] calls this so a player never leaks child processes.
    pub fn stop_all(&self) {
        let sounds: Vec<_> = self.sounds.lock().clone();
        for slot in sounds {
            Self::stop_sound(&mut slot.lock());
        }
    }

    /// Block until the sound's process exits on its own.
    ///
    /// Returns immediately when the sound is not running, and refuses to
    /// wait on an infinite loop, which has no completion point to wait for.
    /// The sound lock is released between polls, so a concurrent `stop`
    /// still gets through.
    pub fn wait(&self, id: SoundId) {
        let Some(slot) = self.sound(id) else {
            return;
        };

        {
            let mut sound = slot.lock();
            if sound.state() != PlaybackState::Running {
                return;
            }
            if sound.current_loop().is_some_and(|l| l.is_infinite()) {
                tracing::warn!(
                    "Can't wait for '{}': sound plays in an infinite loop",
                    sound.file_path.display()
                );
                return;
            }
        }

        loop {
            {
                let mut sound = slot.lock();
                match sound.state() {
                    PlaybackState::Running | PlaybackState::Suspended => {}
                    PlaybackState::Idle | PlaybackState::Exited => return,
                }
            }
            std::thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Current state of a sound; unknown handles read as Idle.
    pub fn state(&self, id: SoundId) -> PlaybackState {
        match self.sound(id) {
            Some(slot) => slot.lock().state(),
            None => PlaybackState::Idle,
        }
    }

    /// Probed total duration in whole seconds, -1 if unknown.
    pub fn duration_secs(&self, id: SoundId) -> i64 {
        self.sound(id)
            .map(|slot| slot.lock().duration_secs)
            .unwrap_or(-1)
    }

    /// OS process id of the sound's current player process, if any.
    pub fn pid(&self, id: SoundId) -> Option<u32> {
        self.sound(id).and_then(|slot| slot.lock().pid())
    }

    /// Override a sound's volume after registration. Clamp law as for the
    /// player-level setter.
    pub fn set_sound_volume(&self, id: SoundId, volume: i32) -> bool {
        match self.sound(id) {
            Some(slot) => slot.lock().settings.set_volume(volume, self.ranges.volume),
            None => false,
        }
    }

    /// Override a sound's speed after registration.
    pub fn set_sound_speed(&self, id: SoundId, speed: f64) -> bool {
        match self.sound(id) {
            Some(slot) => slot.lock().settings.set_speed(speed, self.ranges.speed),
            None => false,
        }
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.lock().len()
    }

    fn sound(&self, id: SoundId) -> Option<Arc<Mutex<Sound>>> {
        let slot = self.sounds.lock().get(id.0).cloned();
        if slot.is_none() {
            tracing::warn!("Unknown sound handle {:?}", id);
        }
        slot
    }

    fn stop_sound(sound: &mut Sound) {
        if sound.state() == PlaybackState::Idle {
            return;
        }
        sound.reset();
        tracing::info!("Stop '{}'", sound.file_path.display());
    }

    fn reconcile_exited(&self, sound: &mut Sound) {
        tracing::debug!(
            "Process for '{}' exited on its own; clearing playback state",
            sound.file_path.display()
        );
        sound.reset();
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_sound_file(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"not really audio").expect("write");
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let player = Player::with_defaults().expect("player");
        assert_eq!(player.volume(), 100);
        assert_eq!(player.speed(), 1.0);
        assert_eq!(player.sound_count(), 0);
    }

    #[test]
    fn test_initial_settings_from_config() {
        let config = PlayerConfig {
            initial_volume: Some(90),
            initial_speed: Some(2.0),
            ..PlayerConfig::default()
        };
        let player = Player::new(config).expect("player");

        assert_eq!(player.volume(), 90);
        assert_eq!(player.speed(), 2.0);
    }

    #[test]
    fn test_out_of_range_initial_settings_are_clamped() {
        let config = PlayerConfig {
            initial_volume: Some(300),
            initial_speed: Some(0.0),
            ..PlayerConfig::default()
        };
        let player = Player::new(config).expect("player");

        assert_eq!(player.volume(), 100);
        assert_eq!(player.speed(), 0.5);
    }

    #[test]
    fn test_set_volume_clamp_law() {
        let player = Player::with_defaults().expect("player");

        assert!(player.set_volume(55));
        assert_eq!(player.volume(), 55);

        assert!(!player.set_volume(-5));
        assert_eq!(player.volume(), 0);

        assert!(!player.set_volume(400));
        assert_eq!(player.volume(), 100);
    }

    #[test]
    fn test_missing_configured_binary_fails_fast() {
        let config = PlayerConfig {
            player_path: Some(PathBuf::from("/no/such/ffplay")),
            ..PlayerConfig::default()
        };
        assert!(matches!(
            Player::new(config),
            Err(Error::PlayerNotFound { .. })
        ));
    }

    #[test]
    fn test_add_sound_missing_file() {
        let player = Player::with_defaults().expect("player");

        let result = player.add_sound("definitely_missing.mp3");
        assert!(matches!(result, Err(Error::SoundFileNotFound { .. })));
        assert_eq!(player.sound_count(), 0);
    }

    #[test]
    fn test_add_sound_registers_in_order() {
        let player = Player::with_defaults().expect("player");
        let (_dir_a, path_a) = temp_sound_file("a.mp3");
        let (_dir_b, path_b) = temp_sound_file("b.mp3");

        let a = player.add_sound(&path_a).expect("a");
        let b = player.add_sound(&path_b).expect("b");

        assert_eq!(player.sound_count(), 2);
        assert_ne!(a, b);
        assert_eq!(player.state(a), PlaybackState::Idle);
        assert_eq!(player.state(b), PlaybackState::Idle);
        assert_eq!(player.pid(a), None);
    }

    #[test]
    fn test_sound_overrides_are_clamped() {
        let player = Player::with_defaults().expect("player");
        let (_dir, path) = temp_sound_file("c.mp3");

        let id = player
            .add_sound_with(&path, Some(250), Some(0.1))
            .expect("sound");

        assert!(!player.set_sound_volume(id, 180));
        assert!(player.set_sound_volume(id, 70));
        assert!(player.set_sound_speed(id, 1.5));
    }

    #[test]
    fn test_unknown_handle_reads_as_idle() {
        let player = Player::with_defaults().expect("player");
        let other = Player::with_defaults().expect("other");
        let (_dir, path) = temp_sound_file("d.mp3");
        let id = other.add_sound(&path).expect("sound");

        // Handle from a different player with no matching slot here.
        assert_eq!(player.state(id), PlaybackState::Idle);
        assert_eq!(player.duration_secs(id), -1);
        assert!(!player.set_sound_volume(id, 50));
        player.stop(id);
        player.wait(id);
    }
}

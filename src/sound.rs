use std::path::{Path, PathBuf};
use std::process::Child;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::process;
use crate::settings::SoundSettings;

/// One playable audio asset and the bookkeeping for its player process.

/// Normalized loop directive for a playback run.
///
/// The raw-count convention: any negative count means "play indefinitely",
/// 0 and 1 both mean "play once", and n > 1 means "play n times".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loop {
    Once,
    Times(u32),
    Infinite,
}

impl Loop {
    pub fn from_count(count: i64) -> Self {
        if count < 0 {
            Loop::Infinite
        } else if count <= 1 {
            Loop::Once
        } else {
            Loop::Times(count as u32)
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Loop::Infinite)
    }
}

impl From<i64> for Loop {
    fn from(count: i64) -> Self {
        Loop::from_count(count)
    }
}

/// Observable state of a tracked sound.
///
/// `Exited` is detected lazily: the supervisor polls the child on the next
/// status query instead of receiving a push notification, so a finished or
/// crashed process shows up as `Exited` until some operation resets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    Suspended,
    Exited,
}

/// Caller-facing handle to a sound owned by a [`Player`](crate::Player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub(crate) usize);

pub(crate) struct Sound {
    pub(crate) file_path: PathBuf,
    pub(crate) settings: SoundSettings,
    pub(crate) duration_secs: i64,
    child: Option<Child>,
    suspended: bool,
    current_loop: Option<Loop>,
}

impl Sound {
    /// Register a sound file. The file must exist now; a dangling path is
    /// the one fatal error in this subsystem.
    pub(crate) fn new(file_path: &Path, settings: SoundSettings) -> Result<Self> {
        if !file_path.exists() {
            return Err(Error::SoundFileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        Ok(Self {
            file_path: file_path.to_path_buf(),
            settings,
            duration_secs: -1,
            child: None,
            suspended: false,
            current_loop: None,
        })
    }

    pub(crate) fn state(&mut self) -> PlaybackState {
        let Some(child) = self.child.as_mut() else {
            return PlaybackState::Idle;
        };

        match child.try_wait() {
            Ok(None) => {
                if self.suspended {
                    PlaybackState::Suspended
                } else {
                    PlaybackState::Running
                }
            }
            // A poll error leaves no way to reach the process again; treat
            // it the same as a process that died on its own.
            Ok(Some(_)) | Err(_) => PlaybackState::Exited,
        }
    }

    pub(crate) fn attach(&mut self, child: Child, looping: Loop) {
        self.child = Some(child);
        self.suspended = false;
        self.current_loop = Some(looping);
    }

    pub(crate) fn current_loop(&self) -> Option<Loop> {
        self.current_loop
    }

    pub(crate) fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(|child| child.id())
    }

    pub(crate) fn suspend(&mut self) -> std::io::Result<()> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };
        process::suspend(child)?;
        self.suspended = true;
        Ok(())
    }

    pub(crate) fn resume(&mut self) -> std::io::Result<()> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };
        process::resume(child)?;
        self.suspended = false;
        Ok(())
    }

    /// Forced reset: unconditionally bring the sound back to Idle.
    ///
    /// Terminates gracefully first and escalates to a hard kill if the
    /// process does not exit within a short grace window. Signals against a
    /// process that already exited are treated as satisfied requests, so
    /// this never fails.
    pub(crate) fn reset(&mut self) {
        self.suspended = false;
        self.current_loop = None;

        let Some(mut child) = self.child.take() else {
            return;
        };

        // A suspended process leaves SIGTERM pending until it runs again.
        let _ = process::resume(&mut child);
        let _ = process::terminate(&mut child);

        for _ in 0..10 {
            match child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => std::thread::sleep(Duration::from_millis(10)),
                Err(_) => break,
            }
        }

        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_sound_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("track.mp3");
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"not really audio").expect("write");
        (dir, path)
    }

    #[test]
    fn test_loop_from_count() {
        assert_eq!(Loop::from_count(-1), Loop::Infinite);
        assert_eq!(Loop::from_count(-42), Loop::Infinite);
        assert_eq!(Loop::from_count(0), Loop::Once);
        assert_eq!(Loop::from_count(1), Loop::Once);
        assert_eq!(Loop::from_count(2), Loop::Times(2));
        assert_eq!(Loop::from_count(7), Loop::Times(7));
    }

    #[test]
    fn test_loop_is_infinite() {
        assert!(Loop::Infinite.is_infinite());
        assert!(!Loop::Once.is_infinite());
        assert!(!Loop::Times(3).is_infinite());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = Sound::new(Path::new("does_not_exist.mp3"), SoundSettings::default());
        assert!(matches!(result, Err(Error::SoundFileNotFound { .. })));
    }

    #[test]
    fn test_new_sound_is_idle() {
        let (_dir, path) = temp_sound_file();
        let mut sound = Sound::new(&path, SoundSettings::default()).expect("sound");

        assert_eq!(sound.state(), PlaybackState::Idle);
        assert_eq!(sound.pid(), None);
        assert_eq!(sound.current_loop(), None);
        assert_eq!(sound.duration_secs, -1);
    }

    #[test]
    fn test_reset_without_process_is_noop() {
        let (_dir, path) = temp_sound_file();
        let mut sound = Sound::new(&path, SoundSettings::default()).expect("sound");

        sound.reset();
        assert_eq!(sound.state(), PlaybackState::Idle);
    }
}

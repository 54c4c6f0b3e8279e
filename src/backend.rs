use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;
use crate::error::{Error, Result};
use crate::settings::EffectiveSettings;
use crate::sound::Loop;

/// External player integration.
///
/// Each supported external tool implements [`PlayerBackend`]: turning
/// resolved settings into an argument vector and reading its companion
/// probe tool's output. The supervisor never branches on a tool name; it
/// only talks to this trait.

/// Which external player a [`PlayerConfig`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Ffplay,
}

/// Capability surface of one external player tool.
pub trait PlayerBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Binary to spawn; a bare command name is looked up on PATH by the OS.
    fn executable(&self) -> &Path;

    /// Deterministic argument vector for one playback run. Pure: building
    /// arguments never spawns anything, so this is unit-testable in
    /// isolation.
    fn build_args(
        &self,
        settings: &EffectiveSettings,
        looping: Loop,
        start_offset_sec: i64,
        file_path: &Path,
    ) -> Vec<OsString>;

    /// Companion tool for duration probing, if the backend has one.
    fn probe_executable(&self) -> Option<&Path> {
        None
    }

    fn probe_args(&self, _file_path: &Path) -> Vec<OsString> {
        Vec::new()
    }

    /// Parse the probe tool's stdout into whole seconds; -1 means unknown.
    fn parse_duration_output(&self, _stdout: &str) -> i64 {
        -1
    }
}

/// Instantiate the backend a config selects, failing fast on an explicitly
/// configured binary path that does not exist.
pub(crate) fn create(config: &PlayerConfig) -> Result<Box<dyn PlayerBackend>> {
    match config.backend {
        BackendKind::Ffplay => Ok(Box::new(Ffplay::from_config(config)?)),
    }
}

/// ffplay, with ffprobe as its duration probe.
pub struct Ffplay {
    executable: PathBuf,
    probe: PathBuf,
}

/// Every spawn is headless, exits when playback completes, and keeps the
/// child quiet on stderr.
const FFPLAY_STATIC_ARGS: [&str; 4] = ["-nodisp", "-autoexit", "-loglevel", "quiet"];

impl Ffplay {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("ffplay"),
            probe: PathBuf::from("ffprobe"),
        }
    }

    /// Apply configured binary path overrides. An explicit player path that
    /// does not exist fails fast; a missing probe path only degrades
    /// duration probing, which is best-effort anyway.
    pub fn from_config(config: &PlayerConfig) -> Result<Self> {
        let mut backend = Self::new();

        if let Some(path) = &config.player_path {
            if !path.exists() {
                return Err(Error::PlayerNotFound { path: path.clone() });
            }
            backend.executable = path.clone();
        }

        if let Some(path) = &config.probe_path {
            backend.probe = path.clone();
        }

        Ok(backend)
    }

    /// ffplay's `-loop` convention: 0 plays forever, n plays n times.
    fn loop_flag_value(looping: Loop) -> u32 {
        match looping {
            Loop::Infinite => 0,
            Loop::Once => 1,
            Loop::Times(n) => n,
        }
    }
}

impl Default for Ffplay {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerBackend for Ffplay {
    fn name(&self) -> &'static str {
        "ffplay"
    }

    fn executable(&self) -> &Path {
        &self.executable
    }

    fn build_args(
        &self,
        settings: &EffectiveSettings,
        looping: Loop,
        start_offset_sec: i64,
        file_path: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(FFPLAY_STATIC_ARGS.len() + 9);
        args.extend(FFPLAY_STATIC_ARGS.iter().map(OsString::from));

        args.push("-loop".into());
        args.push(Self::loop_flag_value(looping).to_string().into());

        args.push("-volume".into());
        args.push(settings.volume.to_string().into());

        args.push("-af".into());
        args.push(format!("atempo={}", settings.speed).into());

        args.push("-ss".into());
        args.push(start_offset_sec.max(0).to_string().into());

        args.push(file_path.as_os_str().to_os_string());
        args
    }

    fn probe_executable(&self) -> Option<&Path> {
        Some(&self.probe)
    }

    fn probe_args(&self, file_path: &Path) -> Vec<OsString> {
        vec![
            "-i".into(),
            file_path.as_os_str().to_os_string(),
            "-show_entries".into(),
            "format=duration".into(),
            "-v".into(),
            "quiet".into(),
            "-of".into(),
            "csv=p=0".into(),
        ]
    }

    fn parse_duration_output(&self, stdout: &str) -> i64 {
        // ffprobe prints a single decimal like "183.722448"; the whole
        // seconds before the separator are the duration.
        stdout
            .trim()
            .split('.')
            .next()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(-1)
    }
}

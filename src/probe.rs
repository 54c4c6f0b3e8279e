//! Best-effort duration probing through the backend's companion tool.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::backend::PlayerBackend;

/// Ask the backend's probe tool for the total duration of `file_path` in
/// whole seconds. Any failure (no probe tool, spawn error, unparseable
/// output) degrades to -1 (unknown) and is never surfaced to the caller.
pub(crate) fn probe_duration(backend: &dyn PlayerBackend, file_path: &Path) -> i64 {
    let Some(probe) = backend.probe_executable() else {
        return -1;
    };

    let output = Command::new(probe)
        .args(backend.probe_args(file_path))
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let duration = backend.parse_duration_output(&stdout);
            tracing::debug!(
                "Probed duration of '{}': {}s",
                file_path.display(),
                duration
            );
            duration
        }
        Err(err) => {
            tracing::debug!(
                "Duration probe failed for '{}': {}",
                file_path.display(),
                err
            );
            -1
        }
    }
}

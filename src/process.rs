//! Low-level control of spawned player processes.
//!
//! Pause and resume map onto SIGSTOP/SIGCONT on Unix. Other platforms have
//! no comparable signal, so suspend/resume report an unsupported error that
//! the supervisor turns into a diagnostic no-op.

use std::io;
use std::process::Child;

#[cfg(unix)]
fn send_signal(child: &Child, signal: libc::c_int) -> io::Result<()> {
    let rc = unsafe { libc::kill(child.id() as libc::pid_t, signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
pub(crate) fn suspend(child: &mut Child) -> io::Result<()> {
    send_signal(child, libc::SIGSTOP)
}

#[cfg(unix)]
pub(crate) fn resume(child: &mut Child) -> io::Result<()> {
    send_signal(child, libc::SIGCONT)
}

/// Ask the process to exit. SIGTERM on Unix; on other platforms the only
/// available request is a hard kill.
#[cfg(unix)]
pub(crate) fn terminate(child: &mut Child) -> io::Result<()> {
    send_signal(child, libc::SIGTERM)
}

#[cfg(not(unix))]
fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "process suspension is not supported on this platform",
    )
}

#[cfg(not(unix))]
pub(crate) fn suspend(_child: &mut Child) -> io::Result<()> {
    Err(unsupported())
}

#[cfg(not(unix))]
pub(crate) fn resume(_child: &mut Child) -> io::Result<()> {
    Err(unsupported())
}

#[cfg(not(unix))]
pub(crate) fn terminate(child: &mut Child) -> io::Result<()> {
    child.kill()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};
    use std::time::Duration;

    fn spawn_sleep(secs: &str) -> Child {
        Command::new("sleep")
            .arg(secs)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn sleep")
    }

    #[test]
    fn test_suspend_and_resume_live_process() {
        let mut child = spawn_sleep("30");

        assert!(suspend(&mut child).is_ok());
        assert!(resume(&mut child).is_ok());

        let _ = child.kill();
        let _ = child.wait();
    }

    #[test]
    fn test_terminate_kills_process() {
        let mut child = spawn_sleep("30");

        assert!(terminate(&mut child).is_ok());

        // SIGTERM ends sleep promptly; bound the wait anyway.
        let mut exited = false;
        for _ in 0..100 {
            if child.try_wait().expect("try_wait").is_some() {
                exited = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        if !exited {
            let _ = child.kill();
            let _ = child.wait();
        }
        assert!(exited);
    }
}

//! Shared test helpers for service tests.
//!
//! Provides cross-platform `exit_status()` and a scriptable `FakeProcess`
//! standing in for a streamed device process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ports::LogProcess;

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> std::process::Output {
    std::process::Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

/// A `LogProcess` whose behaviour is fixed at construction.
pub struct FakeProcess {
    exits: bool,
    kill_fails: bool,
    killed: Arc<AtomicBool>,
    dropped: Arc<AtomicBool>,
}

impl FakeProcess {
    fn new(exits: bool, kill_fails: bool) -> Self {
        Self {
            exits,
            kill_fails,
            killed: Arc::new(AtomicBool::new(false)),
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs until killed.
    pub fn running() -> Self {
        Self::new(false, false)
    }

    /// Exits immediately.
    pub fn exited() -> Self {
        Self::new(true, false)
    }

    /// Runs forever and refuses to be killed.
    pub fn unkillable() -> Self {
        Self::new(false, true)
    }

    pub fn killed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.killed)
    }

    pub fn dropped_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.dropped)
    }
}

impl Drop for FakeProcess {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

impl LogProcess for FakeProcess {
    async fn wait(&mut self) -> anyhow::Result<()> {
        if self.exits {
            Ok(())
        } else {
            std::future::pending().await
        }
    }

    async fn kill(&mut self) -> anyhow::Result<()> {
        if self.kill_fails {
            anyhow::bail!("kill refused");
        }
        self.killed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

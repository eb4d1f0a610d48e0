// elx-core/src/process.rs
//! Single-slot lifecycle of a spawned Electron process.

use std::collections::HashMap;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use elx_common::error::{ElxError, Result};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pipes of a freshly started process. The child itself stays tracked by the
/// controller.
#[derive(Debug)]
pub struct ProcessHandle {
    pub pid: Option<u32>,
    /// Control channel wired to the child's stdin.
    pub control: Option<ChildStdin>,
    pub stdout: Option<ChildStdout>,
    pub stderr: Option<ChildStderr>,
}

#[derive(Debug, Default)]
pub struct ProcessController {
    slot: Mutex<Option<Child>>,
}

impl ProcessController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `executable [entry_file] args...` with exactly `env` as its
    /// environment. A previously tracked child is stopped first.
    pub async fn start(
        &self,
        executable: &Path,
        entry_file: Option<&str>,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<ProcessHandle> {
        let mut slot = self.slot.lock().await;
        if let Some(previous) = slot.take() {
            info!("Stopping previously started Electron process before replacing it");
            terminate(previous)?;
        }

        let mut cmd = Command::new(executable);
        if let Some(entry) = entry_file {
            cmd.arg(entry);
        }
        cmd.args(args)
            .env_clear()
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Spawning {} with {} argument(s)", executable.display(), args.len());
        let mut child = cmd.spawn().map_err(|e| {
            ElxError::CommandExecError(format!(
                "Failed to start {}: {}",
                executable.display(),
                e
            ))
        })?;

        let handle = ProcessHandle {
            pid: child.id(),
            control: child.stdin.take(),
            stdout: child.stdout.take(),
            stderr: child.stderr.take(),
        };
        info!("Started Electron process (pid {:?})", handle.pid);
        *slot = Some(child);
        Ok(handle)
    }

    /// Requests termination of the tracked child without waiting for it.
    /// Returns `false` when nothing was tracked.
    pub async fn stop(&self) -> Result<bool> {
        let mut slot = self.slot.lock().await;
        match slot.take() {
            Some(child) => {
                terminate(child)?;
                Ok(true)
            }
            None => {
                debug!("No Electron process to stop");
                Ok(false)
            }
        }
    }

    #[cfg(test)]
    async fn is_running(&self) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Waits until the tracked child exits on its own, then clears the slot.
    /// Returns `None` if the child was stopped, replaced or never started.
    pub async fn wait_for_exit(&self) -> Result<Option<ExitStatus>> {
        loop {
            {
                let mut slot = self.slot.lock().await;
                let Some(child) = slot.as_mut() else {
                    return Ok(None);
                };
                if let Some(status) = child.try_wait()? {
                    debug!("Electron process exited with {}", status);
                    *slot = None;
                    return Ok(Some(status));
                }
            }
            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
        }
    }
}

/// Sends the termination request and hands the child to a background reaper.
fn terminate(mut child: Child) -> Result<()> {
    if let Ok(Some(status)) = child.try_wait() {
        debug!("Electron process already exited with {}", status);
        return Ok(());
    }

    send_terminate(&mut child)?;
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!("Stopped Electron process exited with {}", status),
            Err(e) => warn!("Failed to reap stopped Electron process: {}", e),
        }
    });
    Ok(())
}

#[cfg(unix)]
fn send_terminate(child: &mut Child) -> Result<()> {
    let Some(pid) = child.id() else {
        return Ok(());
    };
    debug!("Sending SIGTERM to pid {}", pid);
    // SAFETY: `pid` belongs to a child we spawned and have not reaped yet.
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            return Err(ElxError::CommandExecError(format!(
                "Failed to signal pid {pid}: {err}"
            )));
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child) -> Result<()> {
    child
        .start_kill()
        .map_err(|e| ElxError::CommandExecError(format!("Failed to kill process: {e}")))
}

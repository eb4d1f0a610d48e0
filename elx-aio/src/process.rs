// elx-aio/src/process.rs
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Output as StdOutput, Stdio};
use std::time::Duration;

use elx_common::error::{ElxError, Result};
use tokio::process::Command;
use tracing::{debug, error};

const BUSY_RETRIES: u32 = 3;
const BUSY_BACKOFF_MILLIS: u64 = 50;

/// Asynchronously runs an external command and captures its output.
///
/// When `envs` is given it replaces the inherited environment entirely.
pub async fn run_command_async(
    command: impl AsRef<OsStr>,
    args: &[&str],
    cwd: Option<PathBuf>,
    envs: Option<&HashMap<String, String>>,
) -> Result<StdOutput> {
    let command = command.as_ref();
    debug!(
        "Async Running command: {:?} {:?} (cwd: {:?}, envs: {:?})",
        command,
        args,
        cwd,
        envs.map(|e| e.keys().collect::<Vec<_>>())
    );

    let mut attempt = 0;
    loop {
        let mut cmd = Command::new(command);
        cmd.args(args);
        cmd.kill_on_drop(true);

        if let Some(dir) = &cwd {
            cmd.current_dir(dir);
        }
        if let Some(env_map) = envs {
            cmd.env_clear();
            cmd.envs(env_map);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());

        match cmd.output().await {
            Ok(output) => {
                if !output.status.success() {
                    debug!("Async Command failed with status: {}", output.status);
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    if !stderr.trim().is_empty() {
                        debug!("Stderr:\n{}", stderr.trim());
                    }
                } else {
                    debug!("Async Command finished successfully.");
                }
                return Ok(output);
            }
            // A freshly extracted binary can still be held open for writing by a
            // concurrently forked child.
            Err(e) if is_text_file_busy(&e) && attempt < BUSY_RETRIES => {
                attempt += 1;
                debug!("{:?} busy, retrying ({}/{})", command, attempt, BUSY_RETRIES);
                tokio::time::sleep(Duration::from_millis(BUSY_BACKOFF_MILLIS)).await;
            }
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    debug!("Command {:?} not found", command);
                } else {
                    error!("Async Failed to execute command {:?}: {}", command, e);
                }
                return Err(ElxError::CommandExecError(format!("{command:?}: {e}")));
            }
        }
    }
}

#[cfg(unix)]
fn is_text_file_busy(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(libc::ETXTBSY)
}

#[cfg(not(unix))]
fn is_text_file_busy(_e: &std::io::Error) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_status() {
        let output = run_command_async("sh", &["-c", "echo hello; exit 3"], None, None)
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
        assert_eq!(output.status.code(), Some(3));
    }

    #[tokio::test]
    async fn explicit_env_replaces_inherited_env() {
        let env: HashMap<String, String> = [
            ("PATH".to_string(), std::env::var("PATH").unwrap_or_default()),
            ("ELX_PROBE".to_string(), "set".to_string()),
        ]
        .into_iter()
        .collect();
        let output = run_command_async(
            "sh",
            &["-c", "echo \"$ELX_PROBE:${HOME:-unset}\""],
            None,
            Some(&env),
        )
        .await
        .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "set:unset");
    }

    #[tokio::test]
    async fn missing_binary_is_an_exec_error() {
        let result = run_command_async("elx-definitely-missing-binary", &[], None, None).await;
        assert!(matches!(result, Err(ElxError::CommandExecError(_))));
    }
}

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub ok: bool,
    pub output: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

/// Executes project toolchain commands for the build section.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str) -> CommandOutcome;
}

/// Runs commands through `sh -c` in the project root, capturing combined
/// stdout and stderr. Each command leads its own process group, and the whole
/// group is killed when the timeout expires.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    root: PathBuf,
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(root: &Path, timeout: Duration) -> Self {
        Self {
            root: root.to_path_buf(),
            timeout,
        }
    }

    fn execute(&self, command: &str) -> Result<CommandOutcome> {
        let mut log = tempfile::tempfile().context("failed to create command log file")?;
        let stderr_log = log
            .try_clone()
            .context("failed to share command log file with stderr")?;

        let started_at = Instant::now();
        let mut shell = Command::new("sh");
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            shell.process_group(0);
        }
        let mut child = shell
            .arg("-c")
            .arg(command)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::from(
                log.try_clone()
                    .context("failed to share command log file with stdout")?,
            ))
            .stderr(Stdio::from(stderr_log))
            .spawn()
            .with_context(|| format!("failed to spawn `{command}`"))?;

        let (status, timed_out) = wait_with_timeout(&mut child, self.timeout)
            .with_context(|| format!("failed to wait for `{command}`"))?;

        let output = read_log(&mut log)?;
        let ok = !timed_out && status.success();
        info!(
            command,
            ok,
            timed_out,
            exit_code = status.code().unwrap_or(-1),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "command finished"
        );

        Ok(CommandOutcome {
            ok,
            output: if ok { output.trim().to_string() } else { output },
            exit_code: status.code(),
            timed_out,
        })
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> CommandOutcome {
        match self.execute(command) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(command, error = %err, "command could not be executed");
                CommandOutcome {
                    ok: false,
                    output: format!("{err:#}"),
                    exit_code: None,
                    timed_out: false,
                }
            }
        }
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(ExitStatus, bool)> {
    let started_at = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if started_at.elapsed() >= timeout {
            kill_process_group(child);
            let status = child.wait()?;
            return Ok((status, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// The group id equals the shell's pid because it was spawned with
/// `process_group(0)`.
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    let group = format!("-{}", child.id());
    if let Err(err) = Command::new("kill")
        .args(["-KILL", "--", group.as_str()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        warn!(pid = child.id(), error = %err, "failed to signal process group");
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

fn read_log(log: &mut File) -> Result<String> {
    log.seek(SeekFrom::Start(0))
        .context("failed to rewind command log")?;
    let mut bytes = Vec::new();
    log.read_to_end(&mut bytes)
        .context("failed to read command log")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

use crate::utils::file;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::fmt::{Display, Formatter};
use std::io::{self, Read, Write};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Exit code recorded when the shell could not be started or fed its input
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code recorded when the shell was terminated by a signal
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// Exit code recorded when the shell was killed after exceeding its timeout
pub const TIMEOUT_EXIT_CODE: i32 = 124;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

// LOCATE SHELLS

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellRole {
    Reference,
    Implementation,
}

impl Display for ShellRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Implementation => write!(f, "implementation"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{role} shell executable not found at {path}")]
    ShellNotFound { role: ShellRole, path: String },
}

#[derive(Clone, Debug)]
pub struct Shell {
    pub role: ShellRole,
    pub path: PathBuf,
}

impl Shell {
    /// Resolve `path` to an executable, first relative to `current_dir`,
    /// then through `PATH`
    pub fn locate(role: ShellRole, path: &str, current_dir: &Path) -> Result<Shell, ConfigError> {
        let resolved = file::find_executable_path(path, current_dir).map_err(|_| {
            ConfigError::ShellNotFound {
                role,
                path: path.to_owned(),
            }
        })?;

        tracing::debug!(%role, path = %resolved.display(), "located shell");

        Ok(Shell {
            role,
            path: resolved,
        })
    }
}

// RUN COMMANDS

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellStatus {
    Exited(i32),
    Signaled,
    LaunchFailed,
    TimedOut(Duration),
}

impl ShellStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::Signaled => SIGNALED_EXIT_CODE,
            Self::LaunchFailed => LAUNCH_FAILURE_EXIT_CODE,
            Self::TimedOut(_) => TIMEOUT_EXIT_CODE,
        }
    }
}

/// Captured result of one shell invocation, with both streams trimmed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: ShellStatus,
}

impl ShellOutput {
    pub fn new(stdout: &str, stderr: &str, status: ShellStatus) -> ShellOutput {
        ShellOutput {
            stdout: stdout.trim().to_owned(),
            stderr: stderr.trim().to_owned(),
            status,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to start shell: {0}")]
    FailedToSpawn(io::Error),

    #[error("{0} was not captured")]
    PipeNotCaptured(&'static str),

    #[error("failed to write command to stdin: {0}")]
    FailedToWriteStdin(io::Error),

    #[error("failed to wait for shell: {0}")]
    FailedToWait(io::Error),

    #[error("failed to read {0}")]
    FailedToReadOutput(&'static str),
}

/// Run `command` in `shell` the way an interactive user would type it
///
/// The shell is started without arguments and receives `<command>\nexit\n`
/// on stdin. Failures to start or feed the shell are folded into the output
/// as stderr text with [`LAUNCH_FAILURE_EXIT_CODE`].
pub fn run_command(shell: &Shell, command: &str, timeout: Option<Duration>) -> ShellOutput {
    tracing::debug!(
        role = %shell.role,
        shell = %shell.path.display(),
        command,
        "running command"
    );

    match execute(&shell.path, command, timeout) {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!(
                role = %shell.role,
                shell = %shell.path.display(),
                error = %err,
                "shell launch failed"
            );
            ShellOutput::new("", &err.to_string(), ShellStatus::LaunchFailed)
        }
    }
}

fn execute(
    program: &Path,
    command: &str,
    timeout: Option<Duration>,
) -> Result<ShellOutput, RunError> {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    // Own process group, so a timeout can reach everything the shell forks
    cmd.process_group(0);

    let mut child = cmd.spawn().map_err(RunError::FailedToSpawn)?;

    let stdout_reader = spawn_reader(child.stdout.take(), "stdout");
    let stderr_reader = spawn_reader(child.stderr.take(), "stderr");

    if let Err(err) = write_input(&mut child, command) {
        kill_and_reap(&mut child);
        return Err(err);
    }

    let status = match timeout {
        Some(limit) => match wait_with_timeout(&mut child, limit) {
            Ok(Some(exit_status)) => status_from_exit(exit_status),
            Ok(None) => {
                tracing::warn!(command, timeout = ?limit, "shell timed out, killing it");
                kill_and_reap(&mut child);
                ShellStatus::TimedOut(limit)
            }
            Err(err) => {
                kill_and_reap(&mut child);
                return Err(RunError::FailedToWait(err));
            }
        },
        None => status_from_exit(child.wait().map_err(RunError::FailedToWait)?),
    };

    let stdout = join_reader(stdout_reader, "stdout")?;
    let stderr = join_reader(stderr_reader, "stderr")?;

    if let ShellStatus::TimedOut(limit) = status {
        let msg = format!("timed out after {:?}", limit);
        return Ok(ShellOutput::new(&stdout, &msg, status));
    }

    Ok(ShellOutput::new(&stdout, &stderr, status))
}

fn write_input(child: &mut Child, command: &str) -> Result<(), RunError> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or(RunError::PipeNotCaptured("stdin"))?;

    let input = format!("{}\nexit\n", command);
    stdin
        .write_all(input.as_bytes())
        .map_err(RunError::FailedToWriteStdin)?;

    // Dropping closes the pipe so the shell sees end of input
    drop(stdin);

    Ok(())
}

type PipeReader = Option<JoinHandle<io::Result<Vec<u8>>>>;

fn spawn_reader<R>(pipe: Option<R>, name: &'static str) -> PipeReader
where
    R: Read + Send + 'static,
{
    if pipe.is_none() {
        tracing::warn!(pipe = name, "pipe was not captured");
    }

    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf: Vec<u8> = vec![];
            pipe.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn join_reader(reader: PipeReader, name: &'static str) -> Result<String, RunError> {
    let handle = reader.ok_or(RunError::PipeNotCaptured(name))?;

    match handle.join() {
        Ok(Ok(buf)) => Ok(String::from_utf8_lossy(&buf).into_owned()),
        _ => Err(RunError::FailedToReadOutput(name)),
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill the shell's whole process group, then reap the shell
///
/// Forked commands hold the output pipes open, so killing only the shell
/// would leave the readers blocked until they finish.
fn kill_and_reap(child: &mut Child) {
    if let Ok(pid) = i32::try_from(child.id()) {
        if let Err(errno) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
            tracing::debug!(pid, %errno, "failed to kill process group");
        }
    }

    // The child may already have exited on its own
    let _ = child.kill();
    let _ = child.wait();
}

fn status_from_exit(exit_status: ExitStatus) -> ShellStatus {
    match exit_status.code() {
        Some(code) => ShellStatus::Exited(code),
        None => ShellStatus::Signaled,
    }
}

// TESTS

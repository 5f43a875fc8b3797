//! Running a non-builtin command in a child process.
//!
//! Redirection files are opened before the child starts and handed to it as
//! its standard streams; the interpreter's own streams are never replaced.
//! The child is started through a [`Launcher`] and waited for before
//! [`spawn_and_wait`] returns.

use crate::command::{ExitCode, ParsedCommand};
use anyhow::{Context, Result, anyhow};
use std::fs::{File, OpenOptions};
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Permissions for files created by `>` and `>>`, before the umask.
pub const CREATE_MODE: u32 = 0o644;

/// Files that replace a child's standard input and output.
#[derive(Debug, Default)]
pub struct Redirections {
    pub stdin: Option<File>,
    pub stdout: Option<File>,
}

impl Redirections {
    /// Open the redirection targets of `command`, input first.
    ///
    /// If the input file cannot be opened the output file is never touched,
    /// so a failing `<` does not create or truncate the `>` target.
    pub fn open(command: &ParsedCommand) -> Result<Redirections> {
        let stdin = match &command.input_redirect {
            Some(path) => Some(File::open(path).with_context(|| format!("open {}", path))?),
            None => None,
        };
        let stdout = match &command.output_redirect {
            Some(path) => Some(
                output_options(command.append)
                    .open(path)
                    .with_context(|| format!("open {}", path))?,
            ),
            None => None,
        };
        Ok(Redirections { stdin, stdout })
    }

    /// Bind the opened files to the child's streams. Unset streams are inherited.
    pub fn apply(self, cmd: &mut Command) {
        if let Some(file) = self.stdin {
            cmd.stdin(Stdio::from(file));
        }
        if let Some(file) = self.stdout {
            cmd.stdout(Stdio::from(file));
        }
    }
}

fn output_options(append: bool) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    set_create_mode(&mut options);
    options
}

#[cfg(unix)]
fn set_create_mode(options: &mut OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(CREATE_MODE);
}

#[cfg(not(unix))]
fn set_create_mode(_options: &mut OpenOptions) {}

/// Starts child processes and waits for them.
///
/// The interpreter calls `spawn` and then `wait` for the same pid before it
/// spawns again.
pub trait Launcher {
    /// Start `command` and return the child's process id.
    fn spawn(&mut self, command: &mut Command) -> io::Result<u32>;

    /// Block until the child with `pid` terminates.
    fn wait(&mut self, pid: u32) -> io::Result<ExitStatus>;
}

/// [`Launcher`] backed by `std::process`. Holds at most one child.
#[derive(Debug, Default)]
pub struct SystemLauncher {
    running: Option<Child>,
}

impl Launcher for SystemLauncher {
    fn spawn(&mut self, command: &mut Command) -> io::Result<u32> {
        if let Some(child) = &self.running {
            return Err(io::Error::other(format!(
                "child {} has not been waited for",
                child.id()
            )));
        }
        let child = command.spawn()?;
        let pid = child.id();
        self.running = Some(child);
        Ok(pid)
    }

    fn wait(&mut self, pid: u32) -> io::Result<ExitStatus> {
        match self.running.take() {
            Some(mut child) if child.id() == pid => child.wait(),
            other => {
                self.running = other;
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no running child with pid {}", pid),
                ))
            }
        }
    }
}

/// Build the process for `command`: `arguments[0]` is looked up on `PATH`
/// by the platform and receives the full argument vector.
pub fn build_process(command: &ParsedCommand) -> Result<Command> {
    let program = command.name().ok_or_else(|| anyhow!("empty command"))?;
    let mut cmd = Command::new(program);
    cmd.args(command.args());
    Ok(cmd)
}

/// Open redirections, start the child and wait for it.
///
/// Returns the child's pid and exit code. Errors cover everything that kept
/// the child from being started or waited on.
pub fn spawn_and_wait(
    command: &ParsedCommand,
    launcher: &mut dyn Launcher,
) -> Result<(u32, ExitCode)> {
    let mut cmd = build_process(command)?;
    Redirections::open(command)?.apply(&mut cmd);

    let program = command.name().unwrap_or_default();
    let pid = launcher
        .spawn(&mut cmd)
        .with_context(|| format!("exec {}", program))?;
    // Drop the parent's copies of the redirected files before blocking.
    drop(cmd);
    let status = launcher
        .wait(pid)
        .with_context(|| format!("wait {}", pid))?;
    Ok((pid, exit_code(status)))
}

/// Exit code of a finished child; `128 + signal` for signal deaths.
pub fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

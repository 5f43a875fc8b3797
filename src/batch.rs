//! Start a fixed set of commands at once, then reap them in submission order.
//!
//! Unlike the interactive [`Interpreter`](crate::Interpreter), every child is
//! started before the first wait, so all of them may run concurrently. Each
//! exit status is classified and tallied.

use anyhow::Result;
use std::io::{self, Write};
use std::process::{Child, Command, ExitStatus};

/// Exit code recorded for a job whose program could not be started.
pub const NOT_STARTED_CODE: i32 = 127;

/// One command in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Name shown in the progress lines.
    pub label: String,
    pub argv: Vec<String>,
}

impl BatchJob {
    pub fn new(argv: &[&str]) -> Self {
        Self {
            label: argv.first().copied().unwrap_or_default().to_string(),
            argv: argv.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A job shown as `label` that kills itself with `SIGABRT`.
    pub fn aborting(label: &str) -> Self {
        Self {
            label: label.to_string(),
            argv: vec!["sh".into(), "-c".into(), "kill -ABRT $$".into()],
        }
    }
}

/// The demonstration table: ordinary commands, two that do not exist and
/// two that terminate abnormally.
pub fn default_jobs() -> Vec<BatchJob> {
    vec![
        BatchJob::new(&["ls"]),
        BatchJob::new(&["date"]),
        BatchJob::new(&["whoami"]),
        BatchJob::new(&["pwd"]),
        BatchJob::new(&["uname", "-a"]),
        BatchJob::new(&["echo", "Hello Holden"]),
        BatchJob::new(&["sleep", "1"]),
        BatchJob::new(&["sleep", "2"]),
        BatchJob::new(&["invalidcmd1"]),
        BatchJob::new(&["invalidcmd2"]),
        BatchJob::new(&["ps"]),
        BatchJob::new(&["uptime"]),
        BatchJob::new(&["df", "-h"]),
        BatchJob::aborting("free"),
        BatchJob::aborting("id"),
    ]
}

/// How a child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildFate {
    Exited(i32),
    Signaled(i32),
}

pub fn classify(status: ExitStatus) -> ChildFate {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ChildFate::Signaled(signal);
        }
    }
    ChildFate::Exited(status.code().unwrap_or(-1))
}

/// Tally of how the batch's children ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub exited_zero: usize,
    pub exited_nonzero: usize,
    pub signaled: usize,
}

impl BatchSummary {
    fn record(&mut self, fate: ChildFate) {
        match fate {
            ChildFate::Exited(0) => self.exited_zero += 1,
            ChildFate::Exited(_) => self.exited_nonzero += 1,
            ChildFate::Signaled(_) => self.signaled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.exited_zero + self.exited_nonzero + self.signaled
    }
}

enum Slot {
    Running(Child),
    NotStarted,
}

fn start(job: &BatchJob) -> io::Result<Child> {
    let (program, args) = job
        .argv
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty job"))?;
    Command::new(program).args(args).spawn()
}

/// Start every job, then wait for each in the order given.
///
/// Progress and the final summary are written to `out`; the children write
/// to the inherited standard streams.
pub fn run_batch(jobs: &[BatchJob], out: &mut dyn Write) -> Result<BatchSummary> {
    writeln!(out, "Parent PID: {}\n", std::process::id())?;

    let mut slots = Vec::with_capacity(jobs.len());
    for (i, job) in jobs.iter().enumerate() {
        match start(job) {
            Ok(child) => {
                writeln!(
                    out,
                    "Child {} | PID: {} | Executing: {}",
                    i,
                    child.id(),
                    job.label
                )?;
                slots.push(Slot::Running(child));
            }
            Err(e) => {
                writeln!(out, "Child {} | could not start {}: {}", i, job.label, e)?;
                slots.push(Slot::NotStarted);
            }
        }
    }
    out.flush()?;

    writeln!(out, "\n--- Parent Waiting in Creation Order ---\n")?;

    let mut summary = BatchSummary::default();
    for (i, slot) in slots.into_iter().enumerate() {
        let fate = match slot {
            Slot::Running(mut child) => {
                let pid = child.id();
                let fate = classify(child.wait()?);
                match fate {
                    ChildFate::Exited(code) => {
                        writeln!(out, "Child PID {} exited normally with code {}", pid, code)?
                    }
                    ChildFate::Signaled(signal) => {
                        writeln!(out, "Child PID {} terminated by signal {}", pid, signal)?
                    }
                }
                fate
            }
            Slot::NotStarted => {
                writeln!(
                    out,
                    "Child {} ({}) exited normally with code {}",
                    i, jobs[i].label, NOT_STARTED_CODE
                )?;
                ChildFate::Exited(NOT_STARTED_CODE)
            }
        };
        summary.record(fate);
    }

    writeln!(out, "\n--- Summary ---")?;
    writeln!(out, "Normal exit (code 0): {}", summary.exited_zero)?;
    writeln!(out, "Normal exit (non-zero): {}", summary.exited_nonzero)?;
    writeln!(out, "Terminated by signal: {}", summary.signaled)?;
    Ok(summary)
}

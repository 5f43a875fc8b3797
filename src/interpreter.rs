use crate::builtin;
use crate::command::{Builtin, CommandOutcome, ParsedCommand};
use crate::config::ShellConfig;
use crate::env::Environment;
use crate::external::{self, Launcher, SystemLauncher};
use crate::parser;
use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// A minimal interactive interpreter.
///
/// Each line is parsed, then either handled as a built-in (`cd`, `exit`) or
/// run as one child process that is waited for before the call returns.
/// Failures are reported on stderr and never stop the interpreter; only
/// `exit` and end-of-input do.
///
/// Example
/// ```no_run
/// use myshell::Interpreter;
/// use myshell::command::CommandOutcome;
/// let mut sh = Interpreter::default();
/// let outcome = sh.execute_line("echo hello > /tmp/hello.txt");
/// assert!(matches!(outcome, CommandOutcome::ChildSpawned { exit_code: 0, .. }));
/// ```
pub struct Interpreter {
    env: Environment,
    launcher: Box<dyn Launcher>,
}

impl Interpreter {
    /// Create an interpreter that starts children through `launcher`.
    pub fn new(launcher: Box<dyn Launcher>) -> Self {
        Self {
            env: Environment::new(),
            launcher,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// True once `exit` has run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Parse and run one line of input.
    pub fn execute_line(&mut self, line: &str) -> CommandOutcome {
        match parser::parse_line(line) {
            Ok(command) => self.execute(&command),
            Err(e) => {
                report(&e);
                CommandOutcome::ParseFailed(e.to_string())
            }
        }
    }

    /// Run an already parsed command.
    pub fn execute(&mut self, command: &ParsedCommand) -> CommandOutcome {
        if command.is_empty() {
            return CommandOutcome::Empty;
        }
        match Builtin::resolve(command) {
            Builtin::None => match external::spawn_and_wait(command, self.launcher.as_mut()) {
                Ok((pid, exit_code)) => CommandOutcome::ChildSpawned { pid, exit_code },
                Err(e) => {
                    report(format_args!("{:#}", e));
                    CommandOutcome::SpawnFailed(format!("{:#}", e))
                }
            },
            kind => match builtin::run(kind, command, &mut self.env) {
                Ok(()) => CommandOutcome::BuiltinHandled,
                Err(e) => {
                    report(format_args!("{:#}", e));
                    CommandOutcome::BuiltinFailed(format!("{:#}", e))
                }
            },
        }
    }

    /// Read-eval loop over the terminal (or piped standard input).
    ///
    /// Returns `Ok(())` on `exit` or end-of-input. Lines are not kept in history.
    /// A line that is not valid UTF-8 is reported and skipped.
    pub fn repl(&mut self, config: &ShellConfig) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new().context("can't initialise line editor")?;
        // rustyline only draws the prompt on a terminal.
        let piped = !io::stdin().is_terminal();

        while !self.env.should_exit {
            let line = if piped {
                print_prompt(&config.prompt).context("can't write prompt")?;
                rl.readline("")
            } else {
                rl.readline(&config.prompt)
            };
            match line {
                Ok(line) => {
                    self.execute_line(&line);
                }
                // Ctrl-C at the prompt drops the line being typed.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    if config.eof_newline {
                        println!();
                    }
                    break;
                }
                Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    report(format_args!("can't read input: {}", e));
                }
                Err(err) => return Err(err).context("can't read input"),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Interpreter spawning real processes via [`SystemLauncher`].
    fn default() -> Self {
        Self::new(Box::new(SystemLauncher::default()))
    }
}

fn print_prompt(prompt: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()
}

fn report(message: impl Display) {
    eprintln!("myshell: {}", message);
}

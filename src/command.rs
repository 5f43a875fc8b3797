/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Children killed by a signal are recorded as `128 + signal`.
pub type ExitCode = i32;

/// Result of parsing one input line.
///
/// `arguments` never holds an empty string, a redirection operator, or a
/// redirection filename: those are absorbed into the redirect fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Program or built-in name followed by its arguments. Empty for a blank line.
    pub arguments: Vec<String>,
    /// File that replaces the child's standard input.
    pub input_redirect: Option<String>,
    /// File that replaces the child's standard output.
    pub output_redirect: Option<String>,
    /// Append to `output_redirect` instead of truncating it.
    pub append: bool,
}

impl ParsedCommand {
    /// The command name, if the line named one.
    pub fn name(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// Commands the interpreter handles without spawning a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Cd,
    /// Not a built-in: run it as an external program.
    None,
}

impl Builtin {
    /// Classify a parsed command once, before execution.
    pub fn resolve(command: &ParsedCommand) -> Builtin {
        match command.name() {
            Some("exit") => Builtin::Exit,
            Some("cd") => Builtin::Cd,
            _ => Builtin::None,
        }
    }
}

/// What happened to one line handed to the interpreter.
///
/// Transient: produced per line and dropped before the next one is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Blank line; nothing ran.
    Empty,
    /// The line could not be parsed; nothing ran.
    ParseFailed(String),
    /// A built-in ran to completion.
    BuiltinHandled,
    /// A built-in reported an error; the interpreter keeps going.
    BuiltinFailed(String),
    /// A child was started and waited for.
    ChildSpawned { pid: u32, exit_code: ExitCode },
    /// No child could be started (redirection open failure, unknown program, fork failure).
    SpawnFailed(String),
}

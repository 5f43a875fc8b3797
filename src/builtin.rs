use crate::command::{Builtin, ParsedCommand};
use crate::env::Environment;
use anyhow::{Context, Result, anyhow};
use argh::{EarlyExit, FromArgs};
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    fn execute(self, env: &mut Environment) -> Result<()>;
}

/// Run an already classified built-in.
///
/// Redirections on the line are ignored: built-ins never write to a stream.
pub(crate) fn run(builtin: Builtin, command: &ParsedCommand, env: &mut Environment) -> Result<()> {
    match builtin {
        Builtin::Exit => invoke::<Exit>(command.args(), env),
        Builtin::Cd => invoke::<Cd>(command.args(), env),
        Builtin::None => Err(anyhow!(
            "{}: not a builtin",
            command.name().unwrap_or_default()
        )),
    }
}

/// Every word after the name is positional: `--` ends option parsing, so
/// `cd -x`, `cd help` and `exit --help` reach the command unchanged.
fn invoke<T: BuiltinCommand>(args: &[String], env: &mut Environment) -> Result<()> {
    let args: Vec<&str> = std::iter::once("--")
        .chain(args.iter().map(String::as_str))
        .collect();
    match T::from_args(&[T::name()], &args) {
        Ok(cmd) => cmd.execute(env),
        Err(EarlyExit { output, status }) => match status {
            Ok(()) => {
                println!("{}", output);
                Ok(())
            }
            Err(()) => Err(anyhow!("{}", output.trim_end())),
        },
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional, greedy)]
    /// directory to switch to; only the first one is used. Defaults to $HOME when omitted.
    pub targets: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, env: &mut Environment) -> Result<()> {
        let target = match self.targets.into_iter().next() {
            Some(t) => PathBuf::from(t),
            None => env.home_dir().context("cd: HOME not set")?,
        };

        env.change_dir(&target)
            .with_context(|| format!("cd: {}", target.display()))
    }
}

#[derive(FromArgs)]
/// Exit the shell with status 0.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, env: &mut Environment) -> Result<()> {
        env.should_exit = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;
    use crate::test_support::{lock_current_dir, make_unique_temp_dir};
    use std::env as stdenv;
    use std::fs;

    fn run_line(line: &str, env: &mut Environment) -> Result<()> {
        let cmd = parse_line(line).unwrap();
        run(Builtin::resolve(&cmd), &cmd, env)
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_abs").expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();

        let mut env = Environment::new();
        let res = Cd {
            targets: vec![temp.to_string_lossy().to_string()],
        }
        .execute(&mut env);
        let now = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).unwrap();

        assert!(res.is_ok(), "cd failed: {:?}", res.err());
        assert_eq!(fs::canonicalize(now).unwrap(), canonical_temp);
        let _ = fs::remove_dir_all(temp);
    }

    #[test]
    fn test_cd_relative_path() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_rel").expect("failed to create temp dir");
        fs::create_dir_all(temp.join("inner")).unwrap();
        let canonical_inner = fs::canonicalize(temp.join("inner")).unwrap();
        let orig = stdenv::current_dir().unwrap();

        stdenv::set_current_dir(&temp).unwrap();
        let mut env = Environment::new();
        let res = run_line("cd inner", &mut env);
        let now = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).unwrap();

        assert!(res.is_ok());
        assert_eq!(fs::canonicalize(now).unwrap(), canonical_inner);
        let _ = fs::remove_dir_all(temp);
    }

    #[test]
    fn test_cd_without_args_goes_home() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = Environment::new();
        let Some(home) = env.home_dir() else {
            return;
        };

        let res = run_line("cd", &mut env);
        let now = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).unwrap();

        assert!(res.is_ok(), "cd to HOME failed: {:?}", res.err());
        assert_eq!(
            fs::canonicalize(now).unwrap(),
            fs::canonicalize(home).unwrap()
        );
    }

    #[test]
    fn test_cd_nonexistent_reports_and_keeps_dir() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = Environment::new();

        let err = run_line("cd /no/such/dir/xyz", &mut env).unwrap_err();

        assert_eq!(stdenv::current_dir().unwrap(), orig);
        let msg = format!("{:#}", err);
        assert!(msg.starts_with("cd: /no/such/dir/xyz: "), "got {}", msg);
    }

    #[test]
    fn test_cd_uses_first_argument_only() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_first").expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).unwrap();
        let orig = stdenv::current_dir().unwrap();

        let mut env = Environment::new();
        let line = format!("cd {} /no/such/dir", temp.display());
        let res = run_line(&line, &mut env);
        let now = stdenv::current_dir().unwrap();
        stdenv::set_current_dir(&orig).unwrap();

        assert!(res.is_ok());
        assert_eq!(fs::canonicalize(now).unwrap(), canonical_temp);
        let _ = fs::remove_dir_all(temp);
    }

    #[test]
    fn test_exit_sets_flag_and_ignores_args() {
        let mut env = Environment::new();
        assert!(!env.should_exit);
        run_line("exit 3 > somewhere.txt", &mut env).unwrap();
        assert!(env.should_exit);
        assert!(!std::path::Path::new("somewhere.txt").exists());
    }

    #[test]
    fn test_exit_ignores_option_like_args() {
        for line in ["exit --help", "exit help", "exit -x", "exit -1", "exit -- 5"] {
            let mut env = Environment::new();
            let res = run_line(line, &mut env);
            assert!(res.is_ok(), "{}: {:?}", line, res.err());
            assert!(env.should_exit, "{} did not request exit", line);
        }
    }

    #[test]
    fn test_cd_into_dirs_named_like_options() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cd_opts").expect("failed to create temp dir");
        let orig = stdenv::current_dir().unwrap();

        for name in ["-x", "help", "--help"] {
            fs::create_dir_all(temp.join(name)).unwrap();
            let expected = fs::canonicalize(temp.join(name)).unwrap();

            stdenv::set_current_dir(&temp).unwrap();
            let mut env = Environment::new();
            let res = run_line(&format!("cd {}", name), &mut env);
            let now = stdenv::current_dir().unwrap();
            stdenv::set_current_dir(&orig).unwrap();

            assert!(res.is_ok(), "cd {} failed: {:?}", name, res.err());
            assert_eq!(fs::canonicalize(now).unwrap(), expected);
        }
        let _ = fs::remove_dir_all(temp);
    }

    #[test]
    fn test_run_rejects_non_builtin() {
        let mut env = Environment::new();
        assert!(run_line("ls", &mut env).is_err());
    }
}

use myshell::Interpreter;
use myshell::config::ShellConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config: ShellConfig = argh::from_env();
    match Interpreter::default().repl(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("myshell: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

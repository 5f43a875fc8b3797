use argh::FromArgs;
use myshell::batch::{self, BatchJob};
use std::io;
use std::process::ExitCode;

#[derive(FromArgs)]
/// Start a batch of commands at once, wait for each in creation order and summarise how they ended.
struct Args {
    #[argh(positional, greedy)]
    /// commands to run instead of the built-in table; each is split on blanks.
    commands: Vec<String>,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    let jobs = if args.commands.is_empty() {
        batch::default_jobs()
    } else {
        args.commands
            .iter()
            .map(|c| BatchJob::new(&c.split_whitespace().collect::<Vec<_>>()))
            .collect()
    };

    match batch::run_batch(&jobs, &mut io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("process_simulator: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

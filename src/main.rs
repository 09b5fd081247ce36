use clap::Parser;
use loxvm::cli::{Cli, repl, run_file};

fn main() {
    let cli = Cli::parse();

    match cli.file.as_slice() {
        [] => repl(),
        [file] => run_file(file),
        _ => {
            eprintln!("Usage: loxvm [path]");
            std::process::exit(exitcode::USAGE);
        }
    }
}

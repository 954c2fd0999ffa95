use clap::Parser;
use goldtrend::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}

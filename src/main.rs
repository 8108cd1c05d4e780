use clap::Parser;
use std::process::ExitCode;
use tidyname::cli::{Args, run_cli};
use tidyname::logging::init_logging;
use tidyname::output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run_cli(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

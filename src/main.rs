use clap::Parser;
use fmp_importer::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();

    cli::setup_logging(&args);

    match cli::run(&args) {
        Ok(stats) => {
            cli::report_summary(&args, &stats);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

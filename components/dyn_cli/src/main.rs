//! Dynamic JSON CLI
//!
//! Entry point for `dynjson`. Parses CLI arguments, reads the document and
//! delegates to a Session.

use clap::Parser as ClapParser;
use dyn_cli::{read_input, Cli, CliError, Session};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::new(cli.options());

    let result = read_input(cli.file.as_deref()).and_then(|input| session.run(&cli.command, &input));
    match result {
        Ok(outcome) => {
            if !outcome.output.is_empty() {
                println!("{}", outcome.output);
            }
            std::process::exit(outcome.status);
        }
        Err(CliError::Io(e)) => {
            eprintln!("Error: Could not read input: {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

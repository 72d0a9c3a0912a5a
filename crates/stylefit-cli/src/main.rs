use std::error::Error;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "stylefit", about = "Infer a formatter style from a reference corpus")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for the minimal style reproducing the given source files.
    Infer(commands::infer::InferArgs),
    /// Probe formatter adapters and diff backends on this machine.
    Doctor(commands::doctor::DoctorArgs),
    /// Print the stylefit version.
    Version,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Infer(args) => commands::infer::run(&args),
        Command::Doctor(args) => commands::doctor::run(&args),
        Command::Version => commands::version::run(),
    }
}

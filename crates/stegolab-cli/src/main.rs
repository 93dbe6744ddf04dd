use clap::Parser;

mod cli;
mod commands;
mod error;

pub use error::{CliError, CliResult};

fn main() -> CliResult<()> {
    env_logger::init();

    let args = cli::CliArgs::parse();
    match args.command {
        cli::Commands::Embed(args) => args.run(),
        cli::Commands::Extract(args) => args.run(),
        cli::Commands::Analyze(args) => args.run(),
        cli::Commands::Capacity(args) => args.run(),
    }
}

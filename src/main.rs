use anyhow::Result;
use clap::Parser;
use expenso::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

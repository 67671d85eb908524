mod commands;

use clap::Parser;
use color_eyre::eyre::Result;
use commands::Command;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Snake-Out level generation toolbox", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.command.run()
}

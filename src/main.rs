use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use sassy::cli::{Cli, Commands};
use sassy::output::Printer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_env("SASSY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("sassy=debug"),
        _ => EnvFilter::new("sassy=trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let printer = Printer::new();
    let code = match cli.command {
        Commands::Build(args) => sassy::cli::build::run(args, &printer)?,
        Commands::Lint(args) => sassy::cli::lint::run(args, &printer)?,
        Commands::Trace(args) => sassy::cli::trace::run(args, &printer)?,
        Commands::Init(args) => sassy::cli::init::run(args, &printer)?,
        Commands::Completions(args) => sassy::cli::completions::run(args)?,
    };

    Ok(ExitCode::from(code))
}

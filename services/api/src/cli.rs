use crate::demo::{
    run_demo, run_import, run_package, run_readiness, DemoArgs, ImportArgs, PackageArgs,
    ReadinessArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use govbid::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "GovBid Submission Desk",
    about = "Score proposal readiness and assemble submission packages",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Load proposals, sections and requirements from a JSON fixture into a SQLite database
    Import(ImportArgs),
    /// Print the readiness breakdown for a stored proposal
    Readiness(ReadinessArgs),
    /// Assemble the submission package for a stored proposal and write it to disk
    Package(PackageArgs),
    /// Walk the bundled demo proposals through scoring, checklist work and packaging
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// SQLite database to serve from; demo proposals are served from memory otherwise
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Import(args) => run_import(args),
        Command::Readiness(args) => run_readiness(args),
        Command::Package(args) => run_package(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

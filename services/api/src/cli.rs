use crate::demo::{run_demo, run_seed_preview, DemoArgs, SeedArgs};
use crate::server;
use admission::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Admission Service",
    about = "Run and demonstrate the university admission service from the command line",
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
    /// Inspect the exam-slot catalog a seed CSV would produce
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Run an end-to-end CLI demo covering catalog, selection, and intake
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Load a catalog seed CSV and print the resulting program groups
    Seed(SeedArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Catalog seed CSV loaded at startup
    #[arg(long)]
    pub(crate) seed: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog {
            command: CatalogCommand::Seed(args),
        } => run_seed_preview(args),
        Command::Demo(args) => run_demo(args),
    }
}

use crate::demo::{run_demo, run_validate, DemoArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use geotecnia::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Geotecnia y Servicios Intake",
    about = "Run and exercise the contact intake service from the command line",
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
    /// Run an offline intake demo against in-memory providers
    Demo(DemoArgs),
    /// Check a JSON payload against the intake rules without submitting it
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Validate(args) => run_validate(args),
    }
}

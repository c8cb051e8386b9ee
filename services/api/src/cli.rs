use crate::demo::{run_demo, run_profiles, DemoArgs, ProfilesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use trial_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Trial Insights",
    about = "Serve and explore the clinical trial patient-insight dashboard",
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
    /// Print every profile's category scores and placements
    Profiles(ProfilesArgs),
    /// Walk through a scripted move, reset and summary on one profile
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Profiles(args) => run_profiles(args),
        Command::Demo(args) => run_demo(args),
    }
}

use crate::demo::{run_demo, run_recommend, run_weekly, DemoArgs, RecommendArgs, WeeklyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use payment_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "School Payment Advisor",
    about = "Advise when to pay school enrollment fees and tuition",
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
    /// Print today's ranked payment recommendations for a roster file
    Recommend(RecommendArgs),
    /// Project recommendations over the coming days for a roster file
    Weekly(WeeklyArgs),
    /// Walk through a sample roster, optionally saving it for later runs
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
        Command::Recommend(args) => run_recommend(args),
        Command::Weekly(args) => run_weekly(args),
        Command::Demo(args) => run_demo(args),
    }
}

use crate::console::{run_grade, run_take, run_validate, GradeArgs, TakeArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use persona_quiz::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Persona Quiz",
    about = "Serve, take, and grade the personality classification quiz",
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
    /// Take the quiz interactively in the terminal
    Take(TakeArgs),
    /// Grade a full list of answers without prompting
    Grade(GradeArgs),
    /// Load and validate a dataset, then print a category summary
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
        Command::Take(args) => run_take(args),
        Command::Grade(args) => run_grade(args),
        Command::Validate(args) => run_validate(args),
    }
}

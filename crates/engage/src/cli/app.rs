use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    init::InitArgs, report::ReportArgs, schema::SchemaArgs, score::ScoreArgs, seed::SeedArgs,
};

#[derive(Debug, Parser)]
#[command(name = "engage", version, about = "Artist engagement report over a local event store")]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// SQLite database holding `users`, `artists` and `user_events`.
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the engagement report and print it as a JSON envelope.
    Report(ReportArgs),
    /// Print the engagement score for an event type.
    Score(ScoreArgs),
    /// Print the JSON schema of a report row.
    Schema(SchemaArgs),
    /// Create the store tables if they are missing.
    Init(InitArgs),
    /// Load users, artists and events from a JSON fixture.
    Seed(SeedArgs),
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Report(_) => "report",
            Self::Score(_) => "score",
            Self::Schema(_) => "schema",
            Self::Init(_) => "init",
            Self::Seed(_) => "seed",
        }
    }
}

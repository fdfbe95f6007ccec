use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(
    name = "reforma",
    version,
    about = "Brazilian tax reform regime lookup and tax computation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the regime and applicable taxes for a date
    Regime(cmd::regime::RegimeCommand),
    /// List the reform milestones
    Milestones(cmd::milestones::MilestonesCommand),
    /// Check a batch of effective dates against the supported range
    Validate(cmd::validate::ValidateCommand),
    /// Compute taxes for a batch of fiscal documents
    Compute(cmd::compute::ComputeCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Regime(cmd) => cmd.exec(),
        Command::Milestones(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Compute(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}

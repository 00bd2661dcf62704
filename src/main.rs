use build_tracker::cmd;
use build_tracker::export::ExportFormat;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;

/// Build artifact size tracker
///
/// build-tracker compares artifact sizes across a history of builds and
/// checks them against configured budgets.
#[derive(Parser)]
#[command(name = "build-tracker", author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every build in a history
    Compare {
        /// Build history JSON file
        #[arg(value_name = "HISTORY")]
        history: PathBuf,

        /// Size kind to show (defaults to the first kind in the history)
        #[arg(short = 'k', long)]
        size_key: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Ascii)]
        format: ExportFormat,

        /// Exclude artifacts matching this regular expression (repeatable)
        #[arg(long = "filter", value_name = "REGEX")]
        filters: Vec<String>,

        /// Config file (defaults to ./.build-tracker.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sort builds by timestamp before comparing
        #[arg(long)]
        sort: bool,
    },

    /// Check budgets for the latest build
    Check {
        /// Build history JSON file
        #[arg(value_name = "HISTORY")]
        history: PathBuf,

        /// Config file (defaults to ./.build-tracker.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON (for CI/CD integration)
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    // console falls back to plain text for emojis when this is set
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match cli.command {
        Commands::Compare {
            history,
            size_key,
            format,
            filters,
            config,
            sort,
        } => cmd::cmd_compare(&cmd::CompareOptions {
            history,
            size_key,
            format,
            filters,
            config,
            sort,
        }),
        Commands::Check {
            history,
            config,
            json,
        } => cmd::cmd_check(&cmd::CheckOptions {
            history,
            config,
            json,
        }),
        Commands::Completions { shell } => {
            cmd::cmd_completions(shell, &mut Cli::command());
            Ok(())
        }
    };

    if let Err(e) = result {
        use build_tracker::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

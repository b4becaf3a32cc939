//! vocaplan CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vocaplan",
    version,
    about = "Forgetting-curve vocabulary study planner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a study plan
    New {
        /// First study day (YYYY-MM-DD, default: today)
        #[arg(long)]
        start: Option<String>,

        /// Plan file to write
        #[arg(long, default_value = "plan.json")]
        output: PathBuf,

        /// Also write the date-based plan next to the plan file
        #[arg(long)]
        sorted: bool,

        /// Also write an HTML calendar of the plan
        #[arg(long)]
        html: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the date-based view of a plan
    Sort {
        /// Plan file
        #[arg(long)]
        plan: PathBuf,

        /// Output path (default: <plan>_sorted.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the units due on a date
    Due {
        /// Plan file
        #[arg(long)]
        plan: PathBuf,

        /// Date to inspect (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Fetch the words due on a date
    Today {
        /// Plan file
        #[arg(long)]
        plan: PathBuf,

        /// Date to study (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Words file to write
        #[arg(long, default_value = "today_words.json")]
        output: PathBuf,

        /// Also write an HTML page of the words
        #[arg(long)]
        html: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Look up a word's definition
    Search {
        /// Word to look up
        word: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a plan file
    Validate {
        /// Plan file
        #[arg(long)]
        plan: PathBuf,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vocaplan=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::New {
            start,
            output,
            sorted,
            html,
            config,
        } => commands::new::execute(start, output, sorted, html, config),
        Commands::Sort { plan, output } => commands::sort::execute(plan, output),
        Commands::Due { plan, date, format } => commands::due::execute(plan, date, format),
        Commands::Today {
            plan,
            date,
            output,
            html,
            config,
        } => commands::today::execute(plan, date, output, html, config).await,
        Commands::Search { word, config } => commands::search::execute(word, config).await,
        Commands::Validate { plan } => commands::validate::execute(plan),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

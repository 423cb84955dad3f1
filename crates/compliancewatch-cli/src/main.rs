//! CLI for ComplianceWatch — adverse-event monitoring on synthetic data.

mod commands;
mod tui;

use clap::{Parser, Subcommand};
use compliancewatch_server::ServerConfig;

use commands::ConfigArgs;

#[derive(Parser)]
#[command(name = "compliancewatch")]
#[command(about = "ComplianceWatch — AI-powered pharmaceutical compliance monitoring (synthetic data)")]
#[command(version = compliancewatch_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP (HTML page, JSON API, report download)
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8501")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Seed the synthetic data stream for reproducible screens
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum number of concurrent browser sessions kept in memory
        #[arg(long, default_value_t = compliancewatch_core::DEFAULT_MAX_SESSIONS)]
        max_sessions: usize,
    },

    /// Interactive monitoring dashboard (TUI)
    Monitor {
        #[command(flatten)]
        config: ConfigArgs,

        /// Seed the synthetic data stream for reproducible screens
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for reports saved with 's'
        #[arg(long, default_value = "reports")]
        report_dir: String,
    },

    /// Generate the markdown compliance report
    Report {
        #[command(flatten)]
        config: ConfigArgs,

        /// Seed the synthetic data stream
        #[arg(long)]
        seed: Option<u64>,

        /// Directory to write the report into (default: print to stdout)
        #[arg(long)]
        output: Option<String>,
    },

    /// Print the full dashboard view as JSON
    Snapshot {
        #[command(flatten)]
        config: ConfigArgs,

        /// Seed the synthetic data stream
        #[arg(long)]
        seed: Option<u64>,

        /// Write JSON to this path instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            seed,
            max_sessions,
        } => commands::serve::run(ServerConfig {
            host,
            port,
            seed,
            max_sessions,
        }),
        Commands::Monitor {
            config,
            seed,
            report_dir,
        } => commands::monitor::run(&config, seed, &report_dir),
        Commands::Report {
            config,
            seed,
            output,
        } => commands::report::run(&config, seed, output.as_deref()),
        Commands::Snapshot {
            config,
            seed,
            output,
        } => commands::snapshot::run(&config, seed, output.as_deref()),
    }
}

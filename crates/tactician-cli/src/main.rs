mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    advise::AdviseSubcommand, config::ConfigSubcommand, draft::DraftSubcommand,
    knowledge::KnowledgeSubcommand, library::LibrarySubcommand, matches::MatchSubcommand,
    settings::SettingsSubcommand, tactic::TacticSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tactician",
    about = "Soccer Manager 2026 companion: tactics, match history and AI advice",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: auto-detect from .tactician/)
    #[arg(long, global = true, env = "TACTICIAN_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .tactician/ and a default config in the current directory
    Init,

    /// Show counts, badges and settings at a glance
    State,

    /// Manage saved tactics
    Tactic {
        #[command(subcommand)]
        subcommand: TacticSubcommand,
    },

    /// Log, import and export match results
    Match {
        #[command(subcommand)]
        subcommand: MatchSubcommand,
    },

    /// Work on the autosaved match form
    Draft {
        #[command(subcommand)]
        subcommand: DraftSubcommand,
    },

    /// Manage the advisor's knowledge base
    Knowledge {
        #[command(subcommand)]
        subcommand: KnowledgeSubcommand,
    },

    /// Ask the AI advisor
    Advise {
        #[command(subcommand)]
        subcommand: AdviseSubcommand,
    },

    /// Browse, search and compare saved and community tactics
    Library {
        #[command(subcommand)]
        subcommand: LibrarySubcommand,
    },

    /// Theme and update notice
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommand,
    },

    /// List badges and which are earned
    Badges,

    /// Inspect and validate the config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the HTTP API
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "0")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Tactic { subcommand } => cmd::tactic::run(&root, subcommand, cli.json),
        Commands::Match { subcommand } => cmd::matches::run(&root, subcommand, cli.json),
        Commands::Draft { subcommand } => cmd::draft::run(&root, subcommand, cli.json),
        Commands::Knowledge { subcommand } => cmd::knowledge::run(&root, subcommand, cli.json),
        Commands::Advise { subcommand } => cmd::advise::run(&root, subcommand, cli.json),
        Commands::Library { subcommand } => cmd::library::run(&root, subcommand, cli.json),
        Commands::Settings { subcommand } => cmd::settings::run(&root, subcommand, cli.json),
        Commands::Badges => cmd::badges::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

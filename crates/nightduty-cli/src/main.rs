use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nightduty-cli", version, about = "Nightduty flight-duty assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question against the saved session
    Ask(commands::ask::AskArgs),
    /// Interactive conversation
    Chat(commands::chat::ChatArgs),
    /// Conversation history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// PSVs registered during the session
    Registry {
        #[command(subcommand)]
        action: commands::registry::RegistryAction,
    },
    /// Session memory (base reference, last route)
    Memory {
        #[command(subcommand)]
        action: commands::memory::MemoryAction,
    },
    /// Whole-session management
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Regulatory parameters in effect
    Policy {
        #[command(subcommand)]
        action: commands::policy::PolicyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// List the quick prompts
    Prompts,
    /// Print follow-up query suggestions
    Suggest,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Ask(args) => commands::ask::run(args),
        Commands::Chat(args) => commands::chat::run(args),
        Commands::History { action } => commands::history::run(action),
        Commands::Registry { action } => commands::registry::run(action),
        Commands::Memory { action } => commands::memory::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Policy { action } => commands::policy::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Prompts => commands::prompts::run(),
        Commands::Suggest => commands::prompts::suggest(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "nightduty-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

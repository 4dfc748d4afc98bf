use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use nightduty_core::Role;

use super::open_assistant;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Print the conversation so far
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the conversation as a JSON snapshot
    Export {
        /// Output file (defaults to conv-psv-<millis>.json in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Forget the conversation
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = open_assistant()?;
    match action {
        HistoryAction::Show { json } => {
            let history = assistant.history();
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No conversation yet.");
            } else {
                for turn in &history {
                    let who = match turn.role {
                        Role::User => "tú",
                        Role::Assistant => "asistente",
                    };
                    println!("[{who}] {}", turn.text);
                }
            }
        }
        HistoryAction::Export { output } => {
            let snapshot = assistant.export_history(chrono::Utc::now());
            let path = output.unwrap_or_else(|| PathBuf::from(snapshot.file_name()));
            fs::write(&path, snapshot.to_bytes()?)?;
            println!("History exported to: {}", path.display());
        }
        HistoryAction::Clear => {
            assistant.clear_history()?;
            println!("history cleared");
        }
    }
    Ok(())
}

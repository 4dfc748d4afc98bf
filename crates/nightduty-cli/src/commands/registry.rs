use clap::Subcommand;

use super::open_assistant;

#[derive(Subcommand)]
pub enum RegistryAction {
    /// List registered PSVs and the consecutive-night count
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every registered PSV
    Clear,
}

pub fn run(action: RegistryAction) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = open_assistant()?;
    match action {
        RegistryAction::List { json } => {
            let registry = assistant.registry();
            if json {
                println!("{}", serde_json::to_string_pretty(&registry)?);
                return Ok(());
            }
            if registry.is_empty() {
                println!("No PSVs registered.");
                return Ok(());
            }
            for (i, entry) in registry.entries().iter().enumerate() {
                println!("{}. {}", i + 1, entry.summary_line());
            }
            let runs = registry.runs();
            println!();
            println!("Current run: {} (max {})", runs.current_run, runs.max_run);
            let limit = assistant.policy().max_consecutive_nights;
            if registry.exceeds_limit(limit) {
                println!("Exceeds {limit} consecutive nights");
            }
        }
        RegistryAction::Clear => {
            assistant.clear_registry()?;
            println!("registry cleared");
        }
    }
    Ok(())
}

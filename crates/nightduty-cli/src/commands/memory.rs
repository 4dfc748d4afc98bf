use clap::Subcommand;

use super::open_assistant;

#[derive(Subcommand)]
pub enum MemoryAction {
    /// Show the remembered base reference and route
    Show,
    /// Edit session memory
    Set {
        /// Local-time base reference (e.g. "SCL", "UTC-3")
        #[arg(long)]
        base_lt: Option<String>,
        /// Departure station code
        #[arg(long)]
        dep: Option<String>,
        /// Arrival station code
        #[arg(long)]
        arr: Option<String>,
    },
}

pub fn run(action: MemoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = open_assistant()?;
    match action {
        MemoryAction::Show => {
            let memory = assistant.memory();
            println!("{}", serde_json::to_string_pretty(&memory)?);
        }
        MemoryAction::Set { base_lt, dep, arr } => {
            let mut memory = assistant.memory();
            if let Some(base) = base_lt {
                memory.base_lt = base.trim().to_string();
            }
            if let Some(dep) = dep {
                memory.last_dep = dep.trim().to_uppercase();
            }
            if let Some(arr) = arr {
                memory.last_arr = arr.trim().to_uppercase();
            }
            assistant.set_memory(&memory)?;
            println!("ok");
        }
    }
    Ok(())
}

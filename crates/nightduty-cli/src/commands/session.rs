use clap::Subcommand;

use super::open_assistant;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Clear memory, history and registry
    Reset,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Reset => {
            open_assistant()?.reset_session()?;
            println!("session reset");
        }
    }
    Ok(())
}

//! Regulatory parameter commands.
//!
//! Parameters are edited through `config set policy.<name> <value>`; this
//! module only reports what is in effect.

use clap::Subcommand;
use nightduty_core::Config;

#[derive(Subcommand)]
pub enum PolicyAction {
    /// Show the parameters in effect
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PolicyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PolicyAction::Show { json } => {
            let policy = Config::load_or_default().policy;
            if json {
                println!("{}", serde_json::to_string_pretty(&policy)?);
            } else {
                println!("{}", policy.summary());
            }
        }
    }
    Ok(())
}

pub mod ask;
pub mod chat;
pub mod config;
pub mod history;
pub mod memory;
pub mod policy;
pub mod prompts;
pub mod registry;
pub mod session;

use nightduty_core::{Assistant, Config, Database};

/// Assistant over the on-disk session, with the configured policy.
pub fn open_assistant() -> Result<Assistant<Database>, Box<dyn std::error::Error>> {
    let policy = Config::load_or_default().policy;
    Ok(Assistant::new(policy, Database::open()?))
}

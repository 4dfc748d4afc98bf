//! Configuration commands.
//!
//! Keys are dot paths into `config.toml`, e.g. `policy.hv_max_minutes`.
//! Unknown keys are rejected before the file is touched.

use clap::Subcommand;
use nightduty_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dot-path key (e.g. "policy.hv_max_minutes")
        key: String,
    },
    /// Change one value and save
    Set {
        /// Dot-path key
        key: String,
        /// New value
        value: String,
    },
    /// Print every key with its value
    List {
        /// Output the whole file as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore the default policy
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", known_value(&config, &key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let previous = known_value(&config, &key)?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key}: {previous} -> {value}");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for key in config.keys() {
                    println!("{key} = {}", known_value(&config, &key)?);
                }
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

fn known_value(config: &Config, key: &str) -> Result<String, ConfigError> {
    config
        .get(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
}

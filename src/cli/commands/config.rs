//! Configuration management commands.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;

pub fn run_config(action: &ConfigAction, settings: Settings) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&settings)?;
            println!("{}", content);
        }

        ConfigAction::Path => {
            println!("{}", Settings::default_config_path().display());
        }

        ConfigAction::Init => {
            let path = Settings::default_config_path();
            if path.exists() {
                Output::warning(&format!("Config already exists at {}", path.display()));
            } else {
                settings.save()?;
                Output::success(&format!("Wrote config to {}", path.display()));
            }
        }
    }

    Ok(())
}

//! Configuration commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::Config;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display the effective configuration
    Show(ConfigShowArgs),
    /// Write the effective configuration to the config file
    Save(ConfigSaveArgs),
}

/// Display the effective configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Write the effective configuration to the config file
#[derive(Args, Debug, Clone)]
pub struct ConfigSaveArgs {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl ConfigArgs {
    /// Execute config subcommand.
    ///
    /// `config` already has command-line overrides applied. `config_path` is
    /// the `--config` file, if one was given.
    pub fn execute(&self, config: &Config, config_path: Option<&Path>) -> Result<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(config),
            ConfigCommand::Save(args) => {
                let target = match config_path {
                    Some(path) => path.to_path_buf(),
                    None => Config::config_file_path()?,
                };
                args.execute(config, &target)?;
                println!("Saved configuration to {}", target.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    fn execute(&self, config: &Config) -> Result<()> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(config).context("Failed to serialize JSON")?
            );
        } else {
            print!(
                "{}",
                toml::to_string_pretty(config).context("Failed to serialize config")?
            );
        }
        Ok(())
    }
}

impl ConfigSaveArgs {
    fn execute(&self, config: &Config, target: &Path) -> Result<()> {
        if target.exists() && !self.force {
            anyhow::bail!(
                "Config file already exists: {} (use --force to overwrite)",
                target.display()
            );
        }
        config.save_to(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_writes_effective_config() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.server.port = 9000;
        ConfigSaveArgs { force: false }
            .execute(&config, &target)
            .unwrap();

        let loaded = Config::load_from(&target).unwrap();
        assert_eq!(loaded.server.port, 9000);
    }

    #[test]
    fn test_save_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("config.toml");
        std::fs::write(&target, "[server]\nport = 1234\n").unwrap();

        let config = Config::new();
        assert!(ConfigSaveArgs { force: false }
            .execute(&config, &target)
            .is_err());
        assert_eq!(Config::load_from(&target).unwrap().server.port, 1234);

        ConfigSaveArgs { force: true }
            .execute(&config, &target)
            .unwrap();
        assert_eq!(Config::load_from(&target).unwrap().server.port, 8501);
    }
}

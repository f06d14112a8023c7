//! Configuration commands

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use crate::config::{Config, CONFIG_FILE};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write the default configuration to ./rlbook.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show which configuration file is used
    Path,
}

pub async fn run(cmd: ConfigCommands, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => init(&PathBuf::from(CONFIG_FILE), force),
        ConfigCommands::Path => {
            match Config::find_config_file() {
                Some(path) => println!("{}", path.display()),
                None => println!("No configuration file found, using defaults"),
            }
            Ok(())
        }
    }
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite it",
            path.display()
        );
    }

    let rendered = Config::default().to_toml()?;
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        init(&path, false).unwrap();
        let loaded = Config::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.bandit.epsilon, 0.05);

        // A second init needs --force
        assert!(init(&path, false).is_err());
        init(&path, true).unwrap();
    }
}

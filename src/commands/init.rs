use anyhow::{Context, Result};

use crate::config::{self, InitOutcome, CONFIG_FILE};

/// Write a starter `config.json` in the current directory, or in `~/.tdns`
pub fn run(global: bool) -> Result<()> {
    let path = if global {
        config::global_path().context("cannot determine home directory")?
    } else {
        CONFIG_FILE.into()
    };

    match config::write_initial(&path)? {
        InitOutcome::AlreadyExists(path) => {
            println!("⚠️  file {} already exists!", path.display());
        }
        InitOutcome::Created(path) => {
            println!("✅ Successfully created config file at {}", path.display());
        }
    }

    Ok(())
}

use std::io::{Read, Write};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use kvstore::cli::{Cli, Command};
use kvstore::config::Config;
use kvstore::{FileStore, SlotStore, copy_slot};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("kvstore starting at {}", store_path.display());
    let store = FileStore::open(&store_path).context("Failed to open store")?;

    match cli.command {
        Command::List => {
            let slots = store.list()?;
            if slots.is_empty() {
                println!("No slots found");
            } else {
                for slot in slots {
                    let len = store.load(&slot)?.map(|b| b.len()).unwrap_or(0);
                    println!("{} {}", slot.cyan(), format!("({} bytes)", len).dimmed());
                }
            }
        }
        Command::Get { slot } => {
            let bytes = store
                .load(&slot)?
                .ok_or_else(|| eyre::eyre!("Slot not found: {}", slot))?;
            std::io::stdout().write_all(&bytes)?;
        }
        Command::Set { slot, file } => {
            let bytes = match file {
                Some(path) => std::fs::read(&path).context(format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin().read_to_end(&mut buf).context("Failed to read stdin")?;
                    buf
                }
            };
            store.save(&slot, &bytes)?;
            println!("{} Wrote {} bytes to {}", "✓".green(), bytes.len(), slot.cyan());
        }
        Command::Copy { from, to } => {
            let len = copy_slot(&store, &from, &to)?;
            println!("{} Copied {} bytes: {} -> {}", "✓".green(), len, from.cyan(), to.cyan());
        }
    }

    Ok(())
}

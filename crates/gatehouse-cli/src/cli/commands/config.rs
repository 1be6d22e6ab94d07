//! Config command handlers.

use anyhow::Result;

use crate::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let path = paths::config_path();
    if path.exists() {
        println!("Config already exists at: {}", path.display());
        return Ok(());
    }

    Config::write_default(&path)?;
    println!("✓ Created config at: {}", path.display());
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    Config::save_console_url(url)?;
    println!("✓ Set console_url in: {}", paths::config_path().display());
    Ok(())
}

use anyhow::{Context, Result};

use folio_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).context("serializing configuration")?;
    println!("{}", content);
    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        println!("Config already exists at {} (use --force to overwrite)", path.display());
        return Ok(());
    }

    AppConfig::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

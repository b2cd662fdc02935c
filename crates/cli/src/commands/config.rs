use std::path::Path;

use anyhow::Result;
use colored::*;

pub fn execute(dir: &Path, config_path: Option<&str>) -> Result<()> {
    let (config, filepath) = super::load(dir, config_path)?;

    println!(
        "{} {}",
        "Configuration".bold(),
        filepath.display().to_string().cyan()
    );
    println!();

    for entry in config.entries() {
        println!("{}  {}", entry.pattern.cyan().bold(), entry.commands);
    }

    Ok(())
}

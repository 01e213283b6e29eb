//! Initialize Recruta.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use recruta_config::Config;
use recruta_db::Database;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} Recruta is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Database: {}", paths.database_file.display());
        return Ok(());
    }

    println!("{}", "Initializing Recruta...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    if !paths.config_file.exists() {
        Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
        println!("  {} Created config: {}", "✓".green(), paths.config_file.display());
    }

    let _db = Database::open(&paths.database_file).context("Failed to initialize database")?;
    println!("  {} Created database: {}", "✓".green(), paths.database_file.display());
    println!("  {} Parecer inbox: {}", "✓".green(), paths.inbox_dir.display());

    println!();
    println!("{}", "Recruta initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit config: {}", "recruta config edit".cyan());
    println!(
        "  2. Import pareceres: {}",
        format!("recruta import {}", paths.inbox_dir.display()).cyan()
    );
    println!("  3. Check the registry: {}", "recruta stats".cyan());

    Ok(())
}

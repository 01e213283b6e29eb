//! Configuration commands.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use recruta_config::Config;
use std::process::Command;

pub fn show() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'recruta init' first.");
    }

    let contents =
        std::fs::read_to_string(&paths.config_file).context("Failed to read config file")?;

    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("{}", contents);

    Ok(())
}

pub fn edit() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'recruta init' first.");
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            "nano".to_string()
        }
    });

    let parts: Vec<&str> = editor.split_whitespace().collect();
    let (cmd, args) = parts.split_first().context("Invalid editor command")?;

    let status = Command::new(cmd)
        .args(args)
        .arg(&paths.config_file)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with error");
    }

    // Catch mistakes now rather than on the next command
    Config::load_from(&paths.config_file).context("Config file is no longer valid")?;

    println!("{} Configuration saved.", "✓".green());

    Ok(())
}

pub fn add_dir(path: &str) -> Result<()> {
    let paths = get_paths()?;

    let expanded = shellexpand::tilde(path).to_string();
    if !std::path::Path::new(&expanded).is_dir() {
        anyhow::bail!("Directory does not exist: {}", expanded);
    }

    let mut config = Config::load_from(&paths.config_file).context("Failed to load config")?;

    if config.import.directories.contains(&path.to_string()) {
        println!("{} Directory already in import list: {}", "Note:".yellow(), path);
        return Ok(());
    }

    config.add_import_directory(path.to_string());
    config
        .save_to(&paths.config_file)
        .context("Failed to save config")?;

    println!("{} Added import directory: {}", "✓".green(), path);

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let paths = get_paths()?;

    let mut config = Config::load_from(&paths.config_file).context("Failed to load config")?;
    apply_setting(&mut config, key, value)?;
    config.import.validate()?;

    config
        .save_to(&paths.config_file)
        .context("Failed to save config")?;

    println!("{} Set {} = {}", "✓".green(), key.cyan(), value);

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "data_dir"] => {
            config.general.data_dir = Some(value.to_string()).filter(|v| !v.is_empty())
        }
        ["import", "filename_prefix"] => config.import.filename_prefix = value.to_string(),
        ["import", "delimiter"] => config.import.delimiter = value.to_string(),
        ["import", "file_pattern"] => config.import.file_pattern = value.to_string(),
        ["import", "skip_existing"] => {
            config.import.skip_existing = value.parse().context("Invalid boolean value")?;
        }
        ["generator", "enabled"] => {
            config.generator.enabled = value.parse().context("Invalid boolean value")?;
        }
        ["generator", "host"] => config.generator.host = value.to_string(),
        ["generator", "model"] => config.generator.model = value.to_string(),
        ["generator", "timeout_seconds"] => {
            config.generator.timeout_seconds = value.parse().context("Invalid timeout value")?;
        }
        ["generator", "api_key_env"] => config.generator.api_key_env = value.to_string(),
        ["ui", "color"] => {
            config.ui.color = value.parse().context("Invalid boolean value")?;
        }
        ["ui", "date_format"] => config.ui.date_format = value.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();

        apply_setting(&mut config, "import.skip_existing", "false").unwrap();
        apply_setting(&mut config, "generator.model", "qwen2.5:7b").unwrap();
        apply_setting(&mut config, "general.data_dir", "~/recruta").unwrap();

        assert!(!config.import.skip_existing);
        assert_eq!(config.generator.model, "qwen2.5:7b");
        assert_eq!(config.general.data_dir.as_deref(), Some("~/recruta"));
    }

    #[test]
    fn test_apply_setting_rejects_bad_input() {
        let mut config = Config::default();

        assert!(apply_setting(&mut config, "ui.color", "sometimes").is_err());
        assert!(apply_setting(&mut config, "ollama.model", "x").is_err());
        assert!(apply_setting(&mut config, "generator.timeout_seconds", "-3").is_err());
    }
}

//! Import command implementation.

use super::{get_config, get_database, get_paths};
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use recruta_import::{collect_files, ImportOptions, Importer};
use std::path::{Path, PathBuf};

/// Import a parecer file, or every matching file under a directory.
///
/// Without a path, the configured import directories are scanned, falling
/// back to the inbox.
pub fn run(path: Option<&str>, replace: bool, dry_run: bool) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;

    let mut options = ImportOptions::from(&config.import);
    if replace {
        options.skip_existing = false;
    }

    let files = gather_files(path, &config.import.directories, &options.file_pattern)?;
    if files.is_empty() {
        println!("{}", "No parecer files found.".yellow());
        return Ok(());
    }

    println!("Found {} files", files.len());

    let importer = Importer::new(db, options);

    if dry_run {
        return preview(&importer, &files);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = importer.import_batch_with(&files, |path, _| {
        pb.set_message(display_name(path));
        pb.inc(1);
    });

    pb.finish_and_clear();

    let replaced = report.imported.iter().filter(|f| f.replaced).count();
    println!(
        "\n{} {} files{}",
        "Imported:".green().bold(),
        report.imported.len(),
        if replaced > 0 {
            format!(" ({} replaced)", replaced)
        } else {
            String::new()
        }
    );
    if !report.skipped.is_empty() {
        println!(
            "{} {} files (already imported, use --replace)",
            "Skipped:".yellow().bold(),
            report.skipped.len()
        );
    }
    if !report.unresolved.is_empty() {
        println!(
            "{} {} files (no candidate name)",
            "Unresolved:".yellow().bold(),
            report.unresolved.len()
        );
        for path in &report.unresolved {
            println!("  {}", path.display().to_string().dimmed());
        }
    }
    if !report.failed.is_empty() {
        println!("{} {} files", "Failed:".red().bold(), report.failed.len());
        for (path, reason) in &report.failed {
            println!("  {} {}", display_name(path), reason.dimmed());
        }
    }

    Ok(())
}

fn gather_files(path: Option<&str>, directories: &[String], pattern: &str) -> Result<Vec<PathBuf>> {
    let targets: Vec<PathBuf> = match path {
        Some(p) => vec![PathBuf::from(shellexpand::tilde(p).to_string())],
        None if !directories.is_empty() => directories
            .iter()
            .map(|d| PathBuf::from(shellexpand::tilde(d).to_string()))
            .collect(),
        None => vec![get_paths()?.inbox_dir],
    };

    let mut files = Vec::new();
    for target in targets {
        if !target.exists() {
            anyhow::bail!("Path does not exist: {}", target.display());
        }
        if target.is_file() {
            files.push(target);
        } else {
            println!("{} {}", "Scanning:".cyan(), target.display());
            files.extend(collect_files(&target, pattern)?);
        }
    }

    Ok(files)
}

fn preview(importer: &Importer, files: &[PathBuf]) -> Result<()> {
    for path in files {
        println!();
        println!("{}", display_name(path).white().bold());

        match importer.preview(path) {
            Ok(fields) => {
                let candidate = if fields.has_candidate() {
                    fields.candidate_name.green()
                } else {
                    "(not found)".red()
                };
                println!("  Candidate: {}", candidate);
                println!("  Client: {}", blank_dash(&fields.client));
                println!("  Job: {}", blank_dash(&fields.job_title));
                println!("  Location: {}", blank_dash(&fields.location));
                println!("  Age: {}", blank_dash(&fields.age));
                if let Some(ts) = fields.timestamp {
                    println!("  Dated: {}", ts.format("%Y-%m-%d %H:%M"));
                }
                let sections = [
                    ("summary", &fields.summary),
                    ("analysis", &fields.analysis),
                    ("conclusion", &fields.conclusion),
                ]
                .iter()
                .filter(|(_, text)| !text.is_empty())
                .map(|(name, _)| *name)
                .collect::<Vec<_>>();
                println!(
                    "  Sections: {}",
                    if sections.is_empty() {
                        "-".to_string()
                    } else {
                        sections.join(", ")
                    }
                );
            }
            Err(e) => println!("  {} {}", "Error:".red(), e),
        }
    }

    println!("\n{}", "Dry run - nothing was imported.".cyan());
    Ok(())
}

fn blank_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

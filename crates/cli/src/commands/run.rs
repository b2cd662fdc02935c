use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use colored::*;
use globset::Glob;
use stagehand_core::execution::{make_command_tasks, TaskOptions};
use stagehand_core::RunContext;

pub async fn execute(
    dir: &Path,
    config_path: Option<&str>,
    files: Vec<String>,
    shell: bool,
    relative: bool,
) -> Result<()> {
    let (config, filepath) = super::load(dir, config_path)?;
    println!(
        "{} {}",
        "Using configuration".bold(),
        filepath.display().to_string().cyan()
    );

    if files.is_empty() {
        println!("{}", "No files given, nothing to do".bright_black());
        return Ok(());
    }

    let git_dir = find_git_dir(dir);
    let context = RunContext::new();

    for entry in config.entries() {
        let matcher = Glob::new(&entry.pattern)
            .map_err(|e| anyhow!("Invalid pattern '{}': {}", entry.pattern, e))?
            .compile_matcher();
        let matched: Vec<String> = files
            .iter()
            .filter(|file| matcher.is_match(file))
            .cloned()
            .collect();

        // Entries with no matching files are skipped, never resolved
        if matched.is_empty() {
            println!(
                "{} {} {}",
                "−".bright_black(),
                entry.pattern.bright_black(),
                "(no matching files)".bright_black()
            );
            continue;
        }

        println!();
        println!(
            "{} {} {}",
            "❯".bold(),
            entry.pattern.cyan().bold(),
            format!("({} files)", matched.len()).bright_black()
        );

        let options = TaskOptions {
            files: matched,
            shell,
            git_dir: git_dir.clone(),
            relative,
        };
        let tasks = make_command_tasks(&entry.commands, &options)
            .map_err(|e| anyhow!("Failed to resolve tasks for '{}': {}", entry.pattern, e))?;

        for task in tasks {
            match task.run(Some(&context)).await {
                Ok(()) => println!("  {} {}", "✓".green().bold(), task.display()),
                Err(e) => println!("  {} {}", "✗".red().bold(), e.to_string().red()),
            }
        }
    }

    if context.has_errors() {
        return Err(anyhow!("Some tasks failed"));
    }

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        "All tasks completed successfully!".green().bold()
    );
    Ok(())
}

/// Walk up from the base directory to the enclosing git repository root
fn find_git_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = start.canonicalize().ok()?;
    loop {
        if dir.join(".git").exists() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

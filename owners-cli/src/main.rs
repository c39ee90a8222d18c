use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;

/// Suggest reviewers for a set of changed files, or check whether proposed
/// reviewers already cover them.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Changed files (or directories to expand), relative to the root.
    paths: Vec<String>,

    /// Proposed reviewers; with none given, a suggested set is printed.
    #[clap(short = 'r', long = "reviewer")]
    reviewers: Vec<String>,

    /// Repository root containing the OWNERS tree.
    #[clap(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let files = changed_files(&cli)?;
    if files.is_empty() {
        bail!("no files to resolve under {}", cli.root.display());
    }

    let mut resolver = owners_rs::from_root(&cli.root);

    if cli.reviewers.is_empty() {
        let mut reviewers: Vec<String> = resolver
            .reviewers_for(&files)?
            .iter()
            .map(|owner| owner.to_string())
            .collect();
        reviewers.sort();
        for reviewer in reviewers {
            println!("{reviewer}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut uncovered: Vec<String> = resolver
        .files_not_covered_by(&files, &cli.reviewers)?
        .into_iter()
        .collect();
    if uncovered.is_empty() {
        println!("all files covered");
        return Ok(ExitCode::SUCCESS);
    }
    uncovered.sort();
    for file in &uncovered {
        println!("{file}");
    }
    Ok(ExitCode::FAILURE)
}

/// Expand the command-line paths into repository-relative file paths,
/// walking directory arguments down to the files beneath them.
fn changed_files(cli: &Cli) -> Result<Vec<String>> {
    let args = if cli.paths.is_empty() {
        vec![".".to_string()]
    } else {
        cli.paths.clone()
    };

    let mut files = Vec::new();
    for arg in args {
        let full = cli.root.join(&arg);
        if full.is_dir() {
            for entry in walk_files(&full) {
                let rel = entry
                    .path()
                    .strip_prefix(&cli.root)
                    .context("walked outside the repository root")?;
                files.push(rel.to_string_lossy().into_owned());
            }
        } else {
            files.push(arg);
        }
    }
    Ok(files)
}

fn walk_files(root: impl AsRef<Path>) -> impl Iterator<Item = walkdir::DirEntry> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| !entry.file_type().is_dir())
        .filter(|entry| !entry.path().components().any(|c| c.as_os_str() == ".git"))
}

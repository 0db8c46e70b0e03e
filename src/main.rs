use anyhow::{Context, Result};
use arbor::config::load_config;
use arbor::language::extract_path;
use arbor::resolver::{resolve_virtual, ResolveError};
use arbor::vpath;
use arbor::walker::list_all;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "arbor")]
#[command(version)]
#[command(about = "List and read functions, classes, and methods as virtual files")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk a directory and print real paths, directory markers, and
    /// virtual paths in walk order
    List {
        /// Listing root (defaults to the current directory)
        root: Option<PathBuf>,

        /// Emit a JSON object ({"files": [...]}) instead of one path per line
        #[arg(long)]
        json: bool,
    },

    /// Print the exact source of one virtual path (.function/.class/.method)
    Read {
        /// Virtual path relative to the root, e.g. src/a.py/helper.function
        path: String,

        /// Listing root (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Parse a single file and print its structural summary as JSON
    Inspect {
        file: PathBuf,
    },
}

fn cwd_or(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(p) => Ok(p),
        None => std::env::current_dir().context("Failed to get current dir"),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::List { root, json } => {
            let root = cwd_or(root)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} walking tree...")
                    .unwrap()
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
            spinner.enable_steady_tick(std::time::Duration::from_millis(80));
            let files = list_all(&root)?;
            spinner.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string(&json!({ "files": files }))?);
            } else {
                for f in &files {
                    println!("{f}");
                }
            }
        }

        Command::Read { path, root } => {
            let root = cwd_or(root)?;

            if !vpath::is_virtual(&path) {
                eprintln!("arbor: '{path}' carries no virtual suffix; use a plain file read");
                return Ok(ExitCode::from(2));
            }

            match resolve_virtual(&root, &path) {
                Ok(content) => println!("{content}"),
                Err(e @ (ResolveError::SourceNotFound | ResolveError::EntryNotFound { .. })) => {
                    eprintln!("arbor: {e}");
                    return Ok(ExitCode::from(2));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::Inspect { file } => {
            let root = std::env::current_dir().context("Failed to get current dir")?;
            let abs = if file.is_absolute() { file } else { root.join(&file) };
            let cfg = load_config(&root);
            let unit = extract_path(&abs, &cfg);
            println!("{}", serde_json::to_string_pretty(&unit)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

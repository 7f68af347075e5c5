//! script-docs CLI - npm script documentation provider.
//!
//! # Usage
//!
//! ```bash
//! # Describe the script on line 4 of a manifest
//! script-docs hover package.json 4
//!
//! # Read the manifest from stdin
//! cat package.json | script-docs hover - 4
//!
//! # Create or update .vscode/script-docs.json
//! script-docs generate --workspace .
//!
//! # Report the format of the docs file
//! script-docs check
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use script_docs::{
    classify, generate, read_docs_value, relative_manifest_path, resolve_docs_path, DocStore,
    DocsShape, GenerateOptions, HoverProvider, DEFAULT_DOCS_PATH, ROOT_MANIFEST,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "script-docs")]
#[command(about = "npm script documentation provider")]
#[command(version)]
struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Documentation file, relative to the workspace root
    #[arg(long, global = true, default_value = DEFAULT_DOCS_PATH)]
    docs: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe the script on a line of a package.json
    Hover {
        /// package.json file (or - for stdin)
        file: String,

        /// Line number (1-based)
        line: u32,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,
    },

    /// Create or update the documentation file from the workspace manifests
    Generate {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report the format of the documentation file
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Plain,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_writer(io::stderr)
            .init();
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let workspace = match cli.workspace {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    match cli.command {
        Command::Hover { file, line, format } => {
            hover(&workspace, &cli.docs, &file, line, format, cli.verbose)
        }
        Command::Generate { json } => {
            let docs_path = resolve_docs_path(&workspace, &cli.docs);
            let report = generate(&workspace, &docs_path, &GenerateOptions::default())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Documented {} scripts across {} packages in {}",
                    report.scripts,
                    report.packages,
                    report.output.display()
                );
                println!(
                    "  {} kept, {} generated",
                    report.preserved, report.synthesized
                );
                if report.migrated {
                    println!("  migrated legacy documentation format");
                }
                for failure in &report.failures {
                    println!("  skipped {}: {}", failure.path, failure.reason);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let docs_path = resolve_docs_path(&workspace, &cli.docs);
            let Some(value) = read_docs_value(&docs_path)? else {
                println!("{}: not found (built-in defaults apply)", docs_path.display());
                return Ok(ExitCode::SUCCESS);
            };

            let shape = classify(&value);
            let summary = match &shape {
                DocsShape::Nested(docs) => format!("{} packages", docs.len()),
                DocsShape::Legacy(docs) => {
                    format!("{} scripts (migrated on next load)", docs.len())
                }
                DocsShape::Invalid(reason) => {
                    bail!("{}: {}: {}", docs_path.display(), shape.name(), reason)
                }
            };

            println!("{}: {}, {}", docs_path.display(), shape.name(), summary);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn hover(
    workspace: &Path,
    docs: &str,
    file: &str,
    line: u32,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<ExitCode> {
    let (source, package_path) = if file == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        (buffer, ROOT_MANIFEST.to_string())
    } else {
        let source =
            fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?;
        (source, package_path(workspace, Path::new(file)))
    };

    if verbose {
        eprintln!("Manifest: {}, line {}", package_path, line);
    }

    let mut store = DocStore::new(workspace, docs);
    let mut provider = HoverProvider::new(&mut store);

    match provider.hover(&package_path, &source, line) {
        Some(info) => {
            let output = match format {
                OutputFormat::Markdown => info.to_markdown(),
                OutputFormat::Plain => strip_markdown(&info.to_markdown()),
                OutputFormat::Json => serde_json::to_string_pretty(&info)?,
            };
            println!("{}", output);
        }
        None => {
            if verbose {
                eprintln!("No script on this line");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Workspace-relative manifest path; canonicalized so `./package.json` and
/// absolute paths agree.
fn package_path(workspace: &Path, file: &Path) -> String {
    let workspace = fs::canonicalize(workspace).unwrap_or_else(|_| workspace.to_path_buf());
    let file = fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());

    relative_manifest_path(&workspace, &file).unwrap_or_else(|| ROOT_MANIFEST.to_string())
}

/// Strip markdown formatting for plain text output.
fn strip_markdown(md: &str) -> String {
    md.lines()
        .map(|line| {
            line.trim_start_matches('#')
                .trim()
                .replace("**", "")
                .replace('`', "")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Derive results for a config file and write the CSV snapshot
//!
//! Prints the rendered calculator screen, or the raw results as JSON with --json.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use retention_calculator::shell::{render, Session};
use retention_calculator::SessionConfig;

#[derive(Parser, Debug)]
#[command(name = "export_snapshot", version, about = "Write a retention analysis CSV from a config")]
struct Args {
    /// JSON session config; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured export directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print results as JSON instead of the text screen
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = SessionConfig::load_or_default(args.config.as_deref())?;
    let session = Session::new(config);

    if args.json {
        let report = serde_json::json!({
            "inputs": session.inputs(),
            "results": session.results(),
            "insights": session.insights(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&session, Instant::now()));
    }

    let path = session
        .export(args.out_dir.as_deref())
        .context("Failed to write CSV snapshot")?;
    println!("Output written to {}", path.display());

    Ok(())
}

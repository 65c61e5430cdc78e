// src/main.rs

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use std::fs;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::{info, warn};

mod core;
mod logging;

use crate::core::models::{AddScanRequest, ProtocolType, TargetDescriptor};
use crate::core::store::HybridStore;
use crate::core::transform::InputHelper;

#[derive(Debug, Parser)]
#[command(
    name = "sentinel",
    version,
    about = "Rewrites raw scan targets into the canonical form each protocol executor expects"
)]
struct Cli {
    /// Raw targets: hostnames, URLs, host:port pairs, file paths.
    #[arg(value_name = "TARGET")]
    targets: Vec<String>,

    /// File with one raw target per line; `#` starts a comment.
    #[arg(short, long, value_name = "FILE")]
    list: Option<PathBuf>,

    /// Protocol whose executor the targets are being prepared for.
    #[arg(short, long, default_value = "http", value_parser = parse_protocol)]
    protocol: ProtocolType,

    /// JSON map of raw input to previously resolved URL, written by the
    /// probing phase.
    #[arg(long, value_name = "FILE")]
    resolved_inputs: Option<PathBuf>,

    /// Public template identifiers to reference in the emitted scan request.
    #[arg(short, long, value_name = "TEMPLATE")]
    templates: Vec<String>,

    /// Emit an AddScanRequest JSON document instead of plain canonical targets.
    #[arg(long)]
    emit_request: bool,

    /// Mirror log events on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_protocol(raw: &str) -> Result<ProtocolType, String> {
    raw.parse().map_err(|_| {
        let known = ProtocolType::iter()
            .map(|protocol| protocol.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown protocol '{raw}' (expected one of: {known})")
    })
}

fn main() -> Result<()> {
    // --- Setup ---
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::initialize_logging(cli.verbose)?;

    let targets = collect_targets(&cli)?;
    if targets.is_empty() {
        bail!("no targets provided; pass TARGET arguments or --list <FILE>");
    }

    let mut helper = match &cli.resolved_inputs {
        Some(path) => {
            InputHelper::with_resolved_inputs(Box::new(HybridStore::from_json_file(path)?))
        }
        None => InputHelper::new(),
    };

    info!(targets = %targets.len(), protocol = %cli.protocol, "Normalizing targets.");

    // --- Normalization ---
    let mut canonical = Vec::new();
    for raw in &targets {
        let transformed = helper.transform(raw, cli.protocol);
        if transformed.is_empty() {
            warn!(input = %raw, protocol = %cli.protocol, "Input is unusable for this protocol, skipping.");
            continue;
        }
        canonical.push(transformed);
    }

    // --- Output ---
    if cli.emit_request {
        let request = AddScanRequest {
            raw_targets: canonical
                .iter()
                .map(|target| TargetDescriptor::new(target))
                .collect(),
            public_templates: cli.templates.clone(),
            private_templates: None,
            is_temporary: false,
        };
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        for target in &canonical {
            println!("{target}");
        }
    }

    info!(
        kept = %canonical.len(),
        skipped = %(targets.len() - canonical.len()),
        "Normalization finished."
    );

    // The store also releases on drop; closing here surfaces any error.
    helper.close()
}

/// Raccoglie i target dagli argomenti e dall'eventuale file di lista.
/// Collects targets from the arguments and the optional list file.
fn collect_targets(cli: &Cli) -> Result<Vec<String>> {
    let mut targets = cli.targets.clone();
    if let Some(path) = &cli.list {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read target list {}", path.display()))?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            targets.push(line.to_string());
        }
    }
    Ok(targets)
}

mod commands;
mod fs_scanner;
mod logging;
mod progress;
mod report;

use std::fs;
use std::path::{Path, MAIN_SEPARATOR};
use std::process;

use anyhow::{bail, Context};
use bdscan_core::selection::parse_playlist_list;
use bdscan_core::{
    build_listing, build_scan_set, group_playlists, select_playlists, select_whole_disc,
    AppConfig, DiscInventory, ScanEngine, ScanOutcome, SelectionError,
};
use clap::Parser;
use colored::*;
use commands::Cli;
use dotenv::dotenv;
use fs_scanner::FsStreamScanner;
use progress::{CliReporter, SharedBar};
use report::ScanReport;
use tracing::{debug, error, info, warn};

fn main() {
    dotenv().ok();

    let args = Cli::parse();

    let bar = SharedBar::default();
    let _guard = logging::init_logger(bar.clone());

    let config = match bdscan_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    debug!("Configuration: {:?}", config);

    if let Err(err) = run(&args, &config, bar) {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(args: &Cli, config: &AppConfig, bar: SharedBar) -> anyhow::Result<()> {
    if !args.bd_path.exists() {
        bail!("{} does not exist", args.bd_path.display());
    }
    if let Some(output) = &args.output {
        validate_output_path(output)?;
    }

    eprintln!("Please wait while we scan the disc...");
    let inventory_path = args.inventory_path();
    let inventory = DiscInventory::load(&inventory_path)
        .with_context(|| format!("Unable to load disc inventory {}", inventory_path.display()))?;
    info!("{} playlists on disc", inventory.len());

    let selected = if let Some(mpls) = &args.mpls {
        select_playlists(&inventory, &parse_playlist_list(mpls))?
    } else if args.whole || args.list {
        let groups = group_playlists(inventory.playlists());
        let listing = build_listing(&groups, config.enable_ssif);

        if args.list {
            let text = if args.json {
                serde_json::to_string_pretty(&listing)?
            } else {
                listing.to_string()
            };
            return write_output(args.output.as_deref(), &text);
        }
        if listing.has_hidden_tracks {
            eprintln!("{}", bdscan_core::listing::HIDDEN_TRACKS_NOTICE);
        }
        select_whole_disc(&groups)
    } else {
        return Err(anyhow::Error::new(SelectionError::EmptySelection)
            .context("Nothing to scan, pass --mpls, --whole or --list"));
    };

    let scan_set = build_scan_set(&selected, &inventory);
    let engine = ScanEngine::new(config.clone(), FsStreamScanner::new(&args.bd_path));
    let result = engine.run(&scan_set, &CliReporter::new(bar));

    match result.outcome() {
        ScanOutcome::Incomplete => {}
        ScanOutcome::Success => eprintln!("{}", "Scan completed successfully.".green()),
        ScanOutcome::PartialSuccess => {
            warn!("{} stream files failed to scan", result.file_errors.len());
            eprintln!("{}", "Scan completed with errors (see report).".yellow());
        }
    }
    let result = result.into_completed()?;

    let report = ScanReport::generate(&selected, &result, config.enable_ssif);
    let text = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.to_string()
    };
    write_output(args.output.as_deref(), &text)
}

fn validate_output_path(path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        bail!("Value for --output cannot be a directory");
    }
    let raw = path.to_string_lossy();
    if raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR) {
        bail!("Value for --output cannot end with a path separator");
    }
    Ok(())
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Unable to create {}", dir.display()))?;
            }
            fs::write(path, format!("{}\n", output))
                .with_context(|| format!("Unable to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

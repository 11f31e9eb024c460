use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "bdscan", version)]
#[command(about = "Blu-ray playlist grouping and stream scan", long_about = None)]
pub struct Cli {
    /// Path to BD
    #[arg(value_name = "BD_PATH")]
    pub bd_path: PathBuf,

    /// Print the list of playlists
    #[arg(short, long)]
    pub list: bool,

    /// Comma separated list of playlists to scan
    #[arg(short, long, value_name = "PLAYLISTS")]
    pub mpls: Option<String>,

    /// Scan whole disc - every playlist
    #[arg(short, long)]
    pub whole: bool,

    /// Generate the report in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// File to write report to
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Disc inventory manifest (defaults to BD_PATH/inventory.json)
    #[arg(short, long, value_name = "FILE")]
    pub inventory: Option<PathBuf>,
}

impl Cli {
    pub fn inventory_path(&self) -> PathBuf {
        self.inventory
            .clone()
            .unwrap_or_else(|| self.bd_path.join("inventory.json"))
    }
}

use thiserror::Error;

/// Error returned by the crate's loading entry points and by
/// [`crate::ScanResult::into_completed`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// Problems building a [`crate::DiscInventory`] from a manifest.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Error reading inventory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed inventory: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Playlist {playlist} references unknown stream file {stream}")]
    UnknownStream { playlist: String, stream: String },

    #[error("Duplicate {kind} entry: {name}")]
    Duplicate { kind: &'static str, name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No playlists requested")]
    EmptySelection,

    #[error("No matching playlists found on BD (requested: {})", requested.join(", "))]
    NoMatchingPlaylists { requested: Vec<String> },
}

/// Global scan error. `NotRun` and `StillRunning` are sentinels, the rest are
/// setup failures raised before any stream file is read.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Scan has not been run.")]
    NotRun,

    #[error("Scan is still running.")]
    StillRunning,

    #[error("Unable to determine size of {file}: {source}")]
    SizeProbe {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No stream files to scan")]
    EmptyScanSet,
}

/// Failure of a single stream file. Recorded against the file, never propagated.
#[derive(Error, Debug)]
pub enum FileScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Scan worker panicked: {0}")]
    WorkerPanicked(String),
}

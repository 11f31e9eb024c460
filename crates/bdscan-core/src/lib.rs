pub mod config;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod inventory;
pub mod listing;
pub mod model;
pub mod progress;
pub mod result;
pub mod scan_set;
pub mod scanner;
pub mod selection;
pub mod state;
pub mod timefmt;

pub use config::AppConfig;
pub use engine::ScanEngine;
pub use error::{Error, FileScanError, InventoryError, ScanError, SelectionError};
pub use grouping::{group_playlists, shares_clip, PlaylistGroup};
pub use inventory::DiscInventory;
pub use listing::{build_listing, PlaylistInfo, PlaylistListing};
pub use model::{BitrateTally, InterleavedFile, Playlist, StreamClip, StreamFile};
pub use progress::{ProgressReporter, ProgressUpdate, SilentReporter};
pub use result::{FileFailure, ScanOutcome, ScanPhase, ScanResult};
pub use scan_set::{build_scan_set, ScanSet};
pub use scanner::{NullScanner, StreamScanner};
pub use selection::{select_playlists, select_whole_disc};
pub use state::{ScanSnapshot, ScanState};

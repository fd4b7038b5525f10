pub mod error;

pub mod config;

pub mod fs {
    pub mod folder_size;

    pub mod entry_inspector;
    pub use entry_inspector::{DirectoryEntry, EntryInspector, FsInspector};

    pub mod dir_scanner;
    pub use dir_scanner::{DirectoryScanner, scan_dir};
}

pub mod model {
    pub mod sort;
    pub use sort::{SortDirection, SortField, SortSpec, sort_entries};

    pub mod formatted;
    pub use formatted::{FormattedEntry, Labels};
}

pub mod service {
    pub mod listing;
    pub use listing::{Listing, ListingService};
}

pub mod stats {
    pub mod reporter;
    pub use reporter::{StatsReport, StatsReporter};
}

pub mod server {
    pub mod routes;
    pub use routes::{AppState, NodesPayload, NodesResponse, build_router, serve};
}

pub mod logging;
pub use logging::Logger;

pub mod util {
    pub mod humanize;
}

pub use config::Config;
pub use error::AppError;

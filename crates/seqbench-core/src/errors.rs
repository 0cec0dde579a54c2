use std::path::PathBuf;
use thiserror::Error;

/// Errors that make the whole run unusable. Everything else in the harness
/// is recoverable and handled locally with a warning.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalogue file not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read catalogue {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("World invariant violated: {0}")]
    Invariant(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;

/// Recoverable failure of a single location placement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no free {width}x{height} footprint for {name} after {attempts} attempts")]
    Exhausted {
        name: String,
        width: usize,
        height: usize,
        attempts: u32,
    },

    #[error("{name} ({width}x{height}) does not fit on the map")]
    DoesNotFit {
        name: String,
        width: usize,
        height: usize,
    },
}

impl PlacementError {
    pub fn name(&self) -> &str {
        match self {
            PlacementError::Exhausted { name, .. } | PlacementError::DoesNotFit { name, .. } => name,
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapgenError {
    /// A rejection-sampled placement found no empty cell to land on.
    #[error("no empty cell left for {entity} on a {width}x{height} map")]
    PlacementExhausted {
        entity: &'static str,
        width: usize,
        height: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MapgenError>;

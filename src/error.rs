use std::{io, path::PathBuf, result};

use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Parameter {name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("IO error during output: {0}")]
    Io(#[from] io::Error),
    #[error("Error during debug output: {0}")]
    DebugOutput(#[from] serde_json::Error),
}

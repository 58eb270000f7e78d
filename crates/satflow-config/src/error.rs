use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Site configuration not found. Looked in:\n\
        - current directory: satflow.yaml, .satflow.yaml\n\
        - ~/.config/satflow/config.yaml\n\
        Pass --config or set SATFLOW_CONFIG_PATH to point at it directly"
    )]
    ConfigFileNotFound,

    #[error("Site configuration {0} does not exist")]
    ExplicitPathMissing(PathBuf),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid site configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

//! Gateway error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0} not found. Please install it or fix its path in the site configuration")]
    ToolNotFound(String),

    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} {args} failed (exit status {status}): {stderr}")]
    CommandFailed {
        tool: String,
        args: String,
        status: String,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, GatewayError>;

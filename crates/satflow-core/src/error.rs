use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("{0}")]
    Usage(String),

    #[error("{kind} '{name}' not found. Please verify that it is configured properly on Satellite")]
    MissingPrecondition { kind: &'static str, name: String },

    #[error("'{0}' is not a valid IPv4 address")]
    InvalidIp(String),

    #[error(
        "subnet id not found for {0}. Please ensure that the subnet is configured properly in Satellite"
    )]
    SubnetIdNotFound(String),

    #[error(
        "Puppet environment id not found. Please ensure that the Puppet environment {0} is configured properly in Satellite"
    )]
    PuppetEnvironmentNotFound(String),

    #[error("no host-create form matches the supplied interfaces: {0}")]
    InterfaceLayout(String),

    #[error("did not find Kerberos keytab {0}. Please make sure that this file exists before you re-run satflow")]
    KeytabMissing(PathBuf),

    #[error("Kerberos authentication as {principal} failed: {reason}")]
    AuthenticationFailed { principal: String, reason: String },

    #[error(transparent)]
    Gateway(#[from] satflow_gateway::GatewayError),

    #[error(transparent)]
    Config(#[from] satflow_config::ConfigError),
}

impl ProvisionError {
    /// Usage errors are reported together with the command-line help
    pub fn is_usage(&self) -> bool {
        matches!(self, ProvisionError::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

//! satflow core
//!
//! The host provisioning workflow: naming rules, existence probes over
//! `hammer --csv` listings, interface layout selection, Kerberos bootstrap
//! and the [`Provisioner`] that sequences them.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use satflow_core::{Provisioner, RunConfig, RunRequest};
//! use satflow_gateway::SystemRunner;
//!
//! let config = RunConfig::new(request, site)?;
//! let report = Provisioner::new(&config, Arc::new(SystemRunner)).run().await?;
//! ```

pub mod credential;
pub mod error;
pub mod naming;
pub mod nic;
pub mod probe;
pub mod provision;
pub mod request;
pub mod tabular;

pub use credential::CredentialStatus;
pub use error::{ProvisionError, Result};
pub use naming::HostName;
pub use nic::{InterfaceLayout, NicInput, NicSlot};
pub use probe::{Prober, ResourceKind};
pub use provision::{ProvisionReport, Provisioner, StepOutcome, StepRecord};
pub use request::{NetworkZone, RunConfig, RunMode, RunRequest, WorkloadClass};

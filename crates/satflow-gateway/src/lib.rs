//! External CLI gateway for satflow
//!
//! Thin wrappers around the command-line tools satflow drives:
//!
//! - `hammer`: Satellite organizations, locations, subnets, hostgroups, hosts
//! - `ipa`: directory hostgroups and automember rules
//! - `kinit` / `kdestroy` / `klist` / `ipa-getkeytab`: Kerberos tickets
//!
//! Every process goes through the [`CommandRunner`] trait. Wrappers return raw
//! text or exit status; interpreting listings is up to the caller.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use satflow_gateway::{Hammer, SystemRunner};
//!
//! let hammer = Hammer::new(Arc::new(SystemRunner), "/usr/bin/hammer", None);
//! let csv = hammer.list_organizations().await?;
//! ```

pub mod error;
pub mod hammer;
pub mod ipa;
pub mod kerberos;
pub mod runner;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

pub use error::{GatewayError, Result};
pub use hammer::{CreateHostConfig, CreateHostGroupConfig, CreateSubnetConfig, Hammer, HostInterface};
pub use ipa::{DirectoryHostGroup, Ipa};
pub use kerberos::{Kerberos, KerberosTools};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
#[cfg(any(test, feature = "test-utils"))]
pub use scripted::{Invocation, ScriptedRunner};

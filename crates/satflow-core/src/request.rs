//! Run configuration
//!
//! Everything a run needs is resolved once, up front, into an immutable
//! [`RunConfig`] that the workflow borrows.

use crate::error::{ProvisionError, Result};
use crate::naming::{self, HostName};
use crate::nic::{NicInput, NicSlot};
use satflow_config::{SiteConfig, ZoneProxies};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Create,
    Update,
}

impl RunMode {
    /// Exactly one of `--create-host` / `--update-host` must be given
    pub fn from_flags(create: bool, update: bool) -> Result<Self> {
        match (create, update) {
            (true, false) => Ok(RunMode::Create),
            (false, true) => Ok(RunMode::Update),
            (true, true) => Err(ProvisionError::Usage(
                "--create-host and --update-host are mutually exclusive".to_string(),
            )),
            (false, false) => Err(ProvisionError::Usage(
                "you must specify either --create-host or --update-host".to_string(),
            )),
        }
    }
}

/// Network zone; selects the puppet proxy pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkZone {
    Intranet,
    Dmz,
}

impl NetworkZone {
    pub fn from_flags(intranet: bool, dmz: bool) -> Result<Option<Self>> {
        match (intranet, dmz) {
            (true, true) => Err(ProvisionError::Usage(
                "--intranet and --dmz are mutually exclusive".to_string(),
            )),
            (true, false) => Ok(Some(NetworkZone::Intranet)),
            (false, true) => Ok(Some(NetworkZone::Dmz)),
            (false, false) => Ok(None),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NetworkZone::Intranet => "intranet",
            NetworkZone::Dmz => "dmz",
        }
    }
}

/// Workload class; selects the initial parent hostgroup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadClass {
    Application,
    Infrastructure,
}

impl WorkloadClass {
    pub fn from_flags(application: bool, infrastructure: bool) -> Result<Option<Self>> {
        match (application, infrastructure) {
            (true, true) => Err(ProvisionError::Usage(
                "--application and --infrastructure are mutually exclusive".to_string(),
            )),
            (true, false) => Ok(Some(WorkloadClass::Application)),
            (false, true) => Ok(Some(WorkloadClass::Infrastructure)),
            (false, false) => Ok(None),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkloadClass::Application => "application",
            WorkloadClass::Infrastructure => "infrastructure",
        }
    }
}

/// Raw command-line values
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub satellite_server: Option<String>,
    pub client_fqdn: Option<String>,
    pub location: Option<String>,
    pub application_id: Option<String>,
    pub environment: Option<String>,
    pub partitioning: Option<String>,
    pub nics: [NicInput; 3],
    pub create_host: bool,
    pub update_host: bool,
    pub intranet: bool,
    pub dmz: bool,
    pub application: bool,
    pub infrastructure: bool,
    pub verbose: bool,
}

impl RunRequest {
    /// The minimum combination: client FQDN plus exactly one mode flag
    pub fn check_usage(&self) -> Result<RunMode> {
        if self.client_fqdn.as_deref().is_none_or(|f| f.trim().is_empty()) {
            return Err(ProvisionError::Usage(
                "you must specify at least --client-fqdn and either --create-host or --update-host"
                    .to_string(),
            ));
        }
        RunMode::from_flags(self.create_host, self.update_host)
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: HostName,
    pub location: String,
    pub application_id: String,
    pub environment: String,
    pub partitioning: Option<String>,
    pub nics: [NicInput; 3],
    pub mode: RunMode,
    pub zone: Option<NetworkZone>,
    pub workload: Option<WorkloadClass>,
    pub satellite_server: Option<String>,
    pub verbose: bool,
    pub site: SiteConfig,
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ProvisionError::Usage(format!("{} is required", flag)))
}

impl RunConfig {
    pub fn new(request: RunRequest, site: SiteConfig) -> Result<Self> {
        let mode = request.check_usage()?;
        let zone = NetworkZone::from_flags(request.intranet, request.dmz)?;
        let workload = WorkloadClass::from_flags(request.application, request.infrastructure)?;

        let host = HostName::parse(request.client_fqdn.as_deref().unwrap_or_default())?;
        let location = required(request.location, "--location")?;
        let application_id = required(request.application_id, "--application-id")?;
        let environment = required(request.environment, "--environment")?;

        let [primary, rest @ ..] = &request.nics;
        if primary.ip.is_none() && rest.iter().any(|nic| *nic != NicInput::default()) {
            return Err(ProvisionError::Usage(
                "the primary NIC must be given before secondary or third NICs".to_string(),
            ));
        }

        Ok(Self {
            host,
            location,
            application_id,
            environment,
            partitioning: request.partitioning,
            nics: request.nics,
            mode,
            zone,
            workload,
            satellite_server: request.satellite_server,
            verbose: request.verbose,
            site,
        })
    }

    pub fn parent_hostgroup(&self) -> String {
        naming::parent_hostgroup_name(&self.application_id)
    }

    pub fn child_hostgroup(&self) -> String {
        naming::child_hostgroup_name(&self.application_id, &self.environment)
    }

    pub fn puppet_environment_label(&self) -> String {
        naming::puppet_environment_label(
            &self.site.organization,
            &self.environment,
            &self.site.content_view,
        )
    }

    pub fn nic(&self, slot: NicSlot) -> &NicInput {
        &self.nics[slot.ordinal() - 1]
    }

    /// Where the host's boot ISO is written
    pub fn iso_path(&self) -> PathBuf {
        self.site.iso_store.join(naming::iso_file_name(self.host.short()))
    }

    pub fn keytab_path(&self) -> PathBuf {
        self.site.kerberos.keytab_path()
    }

    /// Puppet proxies for the selected zone
    pub fn zone_proxies(&self) -> Result<&ZoneProxies> {
        let zone = self.zone.ok_or_else(|| {
            ProvisionError::Usage(
                "a network zone is required to create a host: pass --intranet or --dmz".to_string(),
            )
        })?;

        let proxies = match zone {
            NetworkZone::Intranet => self.site.zones.intranet.as_ref(),
            NetworkZone::Dmz => self.site.zones.dmz.as_ref(),
        };

        proxies.ok_or_else(|| {
            ProvisionError::Config(satflow_config::ConfigError::Invalid(format!(
                "zones.{} is not configured",
                zone.label()
            )))
        })
    }

    /// Hostgroup a new parent hostgroup is created under
    pub fn initial_parent_hostgroup(&self) -> Result<&str> {
        let workload = self.workload.ok_or_else(|| {
            ProvisionError::Usage(
                "a workload class is required to create the parent hostgroup: pass --application or --infrastructure"
                    .to_string(),
            )
        })?;

        let parent = match workload {
            WorkloadClass::Application => self.site.initial_hostgroups.application.as_deref(),
            WorkloadClass::Infrastructure => self.site.initial_hostgroups.infrastructure.as_deref(),
        };

        parent.ok_or_else(|| {
            ProvisionError::Config(satflow_config::ConfigError::Invalid(format!(
                "initial_hostgroups.{} is not configured",
                workload.label()
            )))
        })
    }
}

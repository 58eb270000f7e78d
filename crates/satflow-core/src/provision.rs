//! Provisioning workflow
//!
//! One sequential pass per host. Each resource is probed and created only
//! when absent; any failure ends the run.
//!
//! 1. resolve the puppet environment id and ensure one subnet per NIC
//! 2. validate organization, location and lifecycle environment
//! 3. ensure the parent hostgroup, then the child hostgroup
//! 4. obtain a Kerberos ticket
//! 5. ensure the IPA hostgroup with its automember rule
//! 6. ensure the host record and download its boot ISO

use crate::credential::{self, CredentialStatus};
use crate::error::{ProvisionError, Result};
use crate::naming;
use crate::nic::{InterfaceLayout, NicSlot, ResolvedNic};
use crate::probe::{Prober, ResourceKind};
use crate::request::{RunConfig, RunMode};
use chrono::{DateTime, Local};
use satflow_gateway::{
    CommandRunner, CreateHostConfig, CreateHostGroupConfig, CreateSubnetConfig, Hammer, Ipa,
    Kerberos, KerberosTools,
};
use std::sync::Arc;

const AUTOMEMBER_KEY: &str = "userclass";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Already there; nothing was created
    Present,
    Created,
    /// Deliberately left alone
    Skipped,
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepOutcome::Present => write!(f, "present"),
            StepOutcome::Created => write!(f, "created"),
            StepOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub resource: &'static str,
    pub name: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub steps: Vec<StepRecord>,
    pub credential: Option<CredentialStatus>,
}

impl ProvisionReport {
    fn new() -> Self {
        Self {
            started_at: Local::now(),
            finished_at: None,
            steps: Vec::new(),
            credential: None,
        }
    }

    fn record(&mut self, resource: &'static str, name: impl Into<String>, outcome: StepOutcome) {
        let name = name.into();
        tracing::debug!("{} {}: {}", resource, name, outcome);
        self.steps.push(StepRecord {
            resource,
            name,
            outcome,
        });
    }

    /// Outcome of the first step recorded for `resource` and `name`
    pub fn outcome(&self, resource: &str, name: &str) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|s| s.resource == resource && s.name == name)
            .map(|s| s.outcome)
    }

    pub fn created(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.outcome == StepOutcome::Created)
    }
}

pub struct Provisioner<'a> {
    config: &'a RunConfig,
    hammer: Hammer,
    ipa: Ipa,
    kerberos: Kerberos,
    prober: Prober,
}

impl<'a> Provisioner<'a> {
    pub fn new(config: &'a RunConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let tools = &config.site.tools;

        let hammer = Hammer::new(
            runner.clone(),
            tools.hammer.clone(),
            config.satellite_server.clone(),
        );
        let ipa = Ipa::new(runner.clone(), tools.ipa.clone());
        let kerberos = Kerberos::new(
            runner,
            KerberosTools {
                kinit: tools.kinit.clone(),
                kdestroy: tools.kdestroy.clone(),
                klist: tools.klist.clone(),
                ipa_getkeytab: tools.ipa_getkeytab.clone(),
            },
        );
        let prober = Prober::new(
            hammer.clone(),
            ipa.clone(),
            config.site.organization.clone(),
            config.site.probe.match_mode,
        );

        Self {
            config,
            hammer,
            ipa,
            kerberos,
            prober,
        }
    }

    pub async fn run(&self) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::new();

        let puppet_environment_id = self.resolve_puppet_environment().await?;
        let nics = self.ensure_subnets(&mut report).await?;

        self.validate_preconditions().await?;

        self.ensure_parent_hostgroup(&mut report).await?;
        self.ensure_child_hostgroup(puppet_environment_id.as_deref(), &mut report)
            .await?;

        let status = credential::bootstrap(&self.kerberos, &self.config.site.kerberos).await?;
        report.credential = Some(status);

        self.ensure_directory_hostgroup(&mut report).await?;
        self.ensure_host(&nics, puppet_environment_id.as_deref(), &mut report)
            .await?;

        report.finished_at = Some(Local::now());
        Ok(report)
    }

    async fn resolve_puppet_environment(&self) -> Result<Option<String>> {
        let label = self.config.puppet_environment_label();
        let id = self
            .prober
            .resolve_id(ResourceKind::PuppetEnvironment, &label)
            .await?;

        match &id {
            Some(id) => tracing::info!("puppet environment {} has id {}", label, id),
            None => tracing::debug!("puppet environment {} not found", label),
        }
        Ok(id)
    }

    async fn ensure_subnets(&self, report: &mut ProvisionReport) -> Result<[ResolvedNic; 3]> {
        let mut resolved = NicSlot::ALL.map(|slot| ResolvedNic {
            slot,
            ip: None,
            mac: None,
            subnet_id: None,
        });

        for (slot, nic) in NicSlot::ALL.into_iter().zip(resolved.iter_mut()) {
            let input = self.config.nic(slot);
            let Some(ip) = input.ip.as_deref() else {
                continue;
            };

            let network = naming::subnet_address(ip)?;
            nic.ip = Some(ip.to_string());
            nic.mac = input.mac.clone();

            if self.prober.exists(ResourceKind::Subnet, &network).await? {
                tracing::info!("subnet {} already exists", network);
                report.record("subnet", network.as_str(), StepOutcome::Present);
            } else {
                self.create_subnet(slot, &network).await?;
                report.record("subnet", network.as_str(), StepOutcome::Created);
            }

            nic.subnet_id = self
                .prober
                .resolve_id(ResourceKind::Subnet, &network)
                .await?;

            match (&nic.subnet_id, slot) {
                (Some(id), _) => tracing::debug!("subnet {} has id {}", network, id),
                (None, NicSlot::Primary) => return Err(ProvisionError::SubnetIdNotFound(network)),
                (None, _) => tracing::warn!(
                    "subnet id for {} ({} NIC) not found",
                    network,
                    slot.label()
                ),
            }
        }

        Ok(resolved)
    }

    async fn create_subnet(&self, slot: NicSlot, network: &str) -> Result<()> {
        let input = self.config.nic(slot);
        let (Some(mask), Some(gateway)) = (input.mask.clone(), input.gateway.clone()) else {
            return Err(ProvisionError::Usage(format!(
                "subnet {} does not exist; creating it needs --{}-nic-mask and --{}-nic-gateway",
                network,
                slot.label(),
                slot.label()
            )));
        };

        tracing::info!("creating subnet {}", network);
        self.hammer
            .create_subnet(&CreateSubnetConfig {
                name: network.to_string(),
                network: network.to_string(),
                mask,
                gateway,
                domain: self.config.host.domain().to_string(),
                location: self.config.location.clone(),
                organization: self.config.site.organization.clone(),
                dns_primary: self.config.site.dns_primary.clone(),
            })
            .await?;
        Ok(())
    }

    async fn validate_preconditions(&self) -> Result<()> {
        let checks = [
            (ResourceKind::Organization, self.config.site.organization.as_str()),
            (ResourceKind::Location, self.config.location.as_str()),
            (
                ResourceKind::LifecycleEnvironment,
                self.config.environment.as_str(),
            ),
        ];

        for (kind, name) in checks {
            if !self.prober.exists(kind, name).await? {
                return Err(ProvisionError::MissingPrecondition {
                    kind: kind.label(),
                    name: name.to_string(),
                });
            }
            tracing::info!("{} {} verified", kind, name);
        }
        Ok(())
    }

    async fn ensure_parent_hostgroup(&self, report: &mut ProvisionReport) -> Result<()> {
        let name = self.config.parent_hostgroup();

        if self.prober.exists(ResourceKind::HostGroup, &name).await? {
            tracing::info!("parent hostgroup {} already exists", name);
            report.record("hostgroup", name, StepOutcome::Present);
            return Ok(());
        }

        let parent = self.config.initial_parent_hostgroup()?;
        tracing::info!("creating parent hostgroup {} under {}", name, parent);
        self.hammer
            .create_hostgroup(&CreateHostGroupConfig {
                name: name.clone(),
                parent: parent.to_string(),
                organization: self.config.site.organization.clone(),
                location: self.config.location.clone(),
                lifecycle_environment: None,
                puppet_environment_id: None,
            })
            .await?;

        report.record("hostgroup", name, StepOutcome::Created);
        Ok(())
    }

    async fn ensure_child_hostgroup(
        &self,
        puppet_environment_id: Option<&str>,
        report: &mut ProvisionReport,
    ) -> Result<()> {
        let name = self.config.child_hostgroup();
        let parameter = &self.config.site.activation_key_parameter;

        if self.prober.exists(ResourceKind::HostGroup, &name).await? {
            tracing::info!("hostgroup {} already exists", name);
            report.record("hostgroup", name.as_str(), StepOutcome::Present);
            report.record("hostgroup parameter", parameter.as_str(), StepOutcome::Skipped);
            return Ok(());
        }

        let puppet_environment_id = puppet_environment_id.ok_or_else(|| {
            ProvisionError::PuppetEnvironmentNotFound(self.config.puppet_environment_label())
        })?;

        tracing::info!("creating hostgroup {}", name);
        self.hammer
            .create_hostgroup(&CreateHostGroupConfig {
                name: name.clone(),
                parent: self.config.parent_hostgroup(),
                organization: self.config.site.organization.clone(),
                location: self.config.location.clone(),
                lifecycle_environment: Some(self.config.environment.clone()),
                puppet_environment_id: Some(puppet_environment_id.to_string()),
            })
            .await?;
        report.record("hostgroup", name.as_str(), StepOutcome::Created);

        tracing::info!("setting {} on hostgroup {}", parameter, name);
        self.hammer
            .set_hostgroup_parameter(&name, parameter, &self.config.site.activation_key)
            .await?;
        report.record("hostgroup parameter", parameter.as_str(), StepOutcome::Created);

        Ok(())
    }

    async fn ensure_directory_hostgroup(&self, report: &mut ProvisionReport) -> Result<()> {
        let name = self.config.child_hostgroup();

        if self.prober.directory_hostgroup_exists(&name).await? {
            tracing::info!("IPA hostgroup {} already exists", name);
            report.record("ipa hostgroup", name.as_str(), StepOutcome::Present);
        } else {
            tracing::info!("creating IPA hostgroup {}", name);
            self.ipa.add_hostgroup(&name).await?;
            self.ipa.add_automember_rule(&name).await?;
            self.ipa
                .add_automember_condition(&name, AUTOMEMBER_KEY, &name)
                .await?;
            report.record("ipa hostgroup", name.as_str(), StepOutcome::Created);
        }

        // Diagnostic only; never ends the run
        if self.config.verbose {
            match self.ipa.show_hostgroup(&name).await {
                Ok(group) => tracing::info!(
                    "IPA hostgroup {}: {} member host(s) [{}]",
                    group.name,
                    group.members.len(),
                    group.members.join(", ")
                ),
                Err(e) => tracing::warn!("could not show IPA hostgroup {}: {}", name, e),
            }
        }

        Ok(())
    }

    async fn ensure_host(
        &self,
        nics: &[ResolvedNic; 3],
        puppet_environment_id: Option<&str>,
        report: &mut ProvisionReport,
    ) -> Result<()> {
        let fqdn = self.config.host.fqdn();
        let exists = self.prober.exists(ResourceKind::Host, fqdn).await?;

        match (exists, self.config.mode) {
            (true, RunMode::Create) => {
                tracing::info!(
                    "host {} already exists; use --update-host to change it",
                    fqdn
                );
                report.record("host", fqdn, StepOutcome::Present);
            }
            (true, RunMode::Update) => {
                tracing::warn!("updating host {} is not supported yet", fqdn);
                report.record("host", fqdn, StepOutcome::Skipped);
            }
            (false, RunMode::Update) => {
                return Err(ProvisionError::Usage(format!(
                    "host {} does not exist; use --create-host to create it",
                    fqdn
                )));
            }
            (false, RunMode::Create) => {
                self.create_host(nics, puppet_environment_id).await?;
                report.record("host", fqdn, StepOutcome::Created);

                let iso = self.config.iso_path();
                tracing::info!("downloading boot ISO to {}", iso.display());
                self.hammer.download_bootdisk(fqdn, &iso).await?;
                report.record("boot iso", iso.display().to_string(), StepOutcome::Created);
            }
        }

        Ok(())
    }

    async fn create_host(
        &self,
        nics: &[ResolvedNic; 3],
        puppet_environment_id: Option<&str>,
    ) -> Result<()> {
        let proxies = self.config.zone_proxies()?;
        let layout = InterfaceLayout::select(nics)?;
        let puppet_environment_id = puppet_environment_id.ok_or_else(|| {
            ProvisionError::PuppetEnvironmentNotFound(self.config.puppet_environment_label())
        })?;

        tracing::info!(
            "creating host {} with {} interface(s)",
            self.config.host.fqdn(),
            layout.interface_count()
        );

        self.hammer
            .create_host(&CreateHostConfig {
                name: self.config.host.short().to_string(),
                organization: self.config.site.organization.clone(),
                location: self.config.location.clone(),
                hostgroup: self.config.child_hostgroup(),
                domain: self.config.host.domain().to_string(),
                realm: self.config.site.realm.clone(),
                puppet_environment_id: puppet_environment_id.to_string(),
                primary: layout.primary().clone(),
                extra_interfaces: layout.extra_interfaces(),
                partition_table: self.config.partitioning.clone(),
                puppet_proxy: proxies.puppet_proxy.clone(),
                puppet_ca_proxy: proxies.puppet_ca_proxy.clone(),
            })
            .await?;
        Ok(())
    }
}

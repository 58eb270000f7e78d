//! hammer CLI wrapper
//!
//! Wraps the Satellite `hammer` commands used for provisioning. Queries run
//! with `--csv` and return the raw tabular text; parsing is left to callers.

use crate::error::Result;
use crate::runner::{CommandRunner, owned_args, run_checked};
use std::path::Path;
use std::sync::Arc;

/// hammer CLI wrapper
#[derive(Clone)]
pub struct Hammer {
    runner: Arc<dyn CommandRunner>,
    program: String,
    server: Option<String>,
}

impl Hammer {
    /// `server` is the Satellite FQDN; when set every call targets
    /// `https://<server>` instead of hammer's configured default.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        program: impl Into<String>,
        server: Option<String>,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            server,
        }
    }

    fn base_args(&self) -> Vec<String> {
        match &self.server {
            Some(server) => vec!["--server".to_string(), format!("https://{}", server)],
            None => Vec::new(),
        }
    }

    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut full = self.base_args();
        full.extend(owned_args(args));
        run_checked(self.runner.as_ref(), &self.program, &full).await
    }

    /// Run a `--csv` list query; a non-zero exit status is an error
    async fn query(&self, args: &[&str]) -> Result<String> {
        let mut full = vec!["--csv"];
        full.extend_from_slice(args);
        self.run_command(&full).await
    }

    // ========== Queries ==========

    pub async fn list_organizations(&self) -> Result<String> {
        self.query(&["organization", "list"]).await
    }

    pub async fn list_locations(&self) -> Result<String> {
        self.query(&["location", "list"]).await
    }

    pub async fn list_lifecycle_environments(&self, organization: &str) -> Result<String> {
        self.query(&["lifecycle-environment", "list", "--organization", organization])
            .await
    }

    pub async fn list_subnets(&self) -> Result<String> {
        self.query(&["subnet", "list"]).await
    }

    pub async fn list_hosts(&self) -> Result<String> {
        self.query(&["host", "list"]).await
    }

    /// Puppet environments
    pub async fn list_environments(&self) -> Result<String> {
        self.query(&["environment", "list"]).await
    }

    /// `hostgroup info` for one hostgroup.
    ///
    /// hammer exits non-zero when the hostgroup does not exist, so a failed
    /// lookup yields `None` rather than an error. Spawn failures still fail.
    pub async fn hostgroup_info(&self, name: &str) -> Result<Option<String>> {
        let mut args = self.base_args();
        args.extend(owned_args(&["--csv", "hostgroup", "info", "--name", name]));

        let output = self.runner.run(&self.program, &args).await?;
        if !output.is_success() {
            tracing::debug!(
                "hostgroup info {} exited with {:?}: {}",
                name,
                output.status,
                output.stderr.trim()
            );
            return Ok(None);
        }
        Ok(Some(output.stdout))
    }

    // ========== Mutations ==========

    pub async fn create_subnet(&self, config: &CreateSubnetConfig) -> Result<()> {
        self.run_command(&[
            "subnet",
            "create",
            "--boot-mode",
            "Static",
            "--domains",
            config.domain.as_str(),
            "--locations",
            config.location.as_str(),
            "--name",
            config.name.as_str(),
            "--network",
            config.network.as_str(),
            "--mask",
            config.mask.as_str(),
            "--gateway",
            config.gateway.as_str(),
            "--organizations",
            config.organization.as_str(),
            "--dns-primary",
            config.dns_primary.as_str(),
            "--ipam",
            "None",
        ])
        .await?;
        Ok(())
    }

    pub async fn create_hostgroup(&self, config: &CreateHostGroupConfig) -> Result<()> {
        let mut args = vec![
            "hostgroup",
            "create",
            "--name",
            config.name.as_str(),
            "--parent",
            config.parent.as_str(),
        ];

        if let Some(ref lifecycle) = config.lifecycle_environment {
            args.push("--lifecycle-environment");
            args.push(lifecycle.as_str());
        }

        args.push("--organizations");
        args.push(config.organization.as_str());

        if let Some(ref env_id) = config.puppet_environment_id {
            args.push("--environment-id");
            args.push(env_id.as_str());
        }

        args.push("--locations");
        args.push(config.location.as_str());

        self.run_command(&args).await?;
        Ok(())
    }

    pub async fn set_hostgroup_parameter(
        &self,
        hostgroup: &str,
        name: &str,
        value: &str,
    ) -> Result<()> {
        self.run_command(&[
            "hostgroup",
            "set-parameter",
            "--name",
            name,
            "--value",
            value,
            "--hostgroup",
            hostgroup,
        ])
        .await?;
        Ok(())
    }

    pub async fn create_host(&self, config: &CreateHostConfig) -> Result<()> {
        let extra: Vec<String> = config
            .extra_interfaces
            .iter()
            .map(|(identifier, nic)| nic.interface_arg(identifier))
            .collect();

        let mut args = vec![
            "host",
            "create",
            "--name",
            config.name.as_str(),
            "--organization",
            config.organization.as_str(),
            "--location",
            config.location.as_str(),
            "--hostgroup",
            config.hostgroup.as_str(),
            "--ip",
            config.primary.ip.as_str(),
            "--mac",
            config.primary.mac.as_str(),
            "--subnet-id",
            config.primary.subnet_id.as_str(),
            "--domain",
            config.domain.as_str(),
            "--realm",
            config.realm.as_str(),
            "--environment-id",
            config.puppet_environment_id.as_str(),
        ];

        for interface in &extra {
            args.push("--interface");
            args.push(interface.as_str());
        }

        if let Some(ref ptable) = config.partition_table {
            args.push("--partition-table");
            args.push(ptable.as_str());
        }

        args.push("--puppet-ca-proxy");
        args.push(config.puppet_ca_proxy.as_str());
        args.push("--puppet-proxy");
        args.push(config.puppet_proxy.as_str());

        self.run_command(&args).await?;
        Ok(())
    }

    /// Download the host's boot ISO to `file`
    pub async fn download_bootdisk(&self, host: &str, file: &Path) -> Result<()> {
        let file = file.display().to_string();
        self.run_command(&["bootdisk", "host", "--host", host, "--file", file.as_str()])
            .await?;
        Ok(())
    }
}

/// Configuration for creating a subnet
#[derive(Debug, Clone)]
pub struct CreateSubnetConfig {
    pub name: String,
    pub network: String,
    pub mask: String,
    pub gateway: String,
    pub domain: String,
    pub location: String,
    pub organization: String,
    pub dns_primary: String,
}

/// Configuration for creating a hostgroup
#[derive(Debug, Clone)]
pub struct CreateHostGroupConfig {
    pub name: String,
    pub parent: String,
    pub organization: String,
    pub location: String,
    pub lifecycle_environment: Option<String>,
    pub puppet_environment_id: Option<String>,
}

/// A fully resolved host interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInterface {
    pub ip: String,
    pub mac: String,
    pub subnet_id: String,
}

impl HostInterface {
    /// Value for `hammer host create --interface`
    pub fn interface_arg(&self, identifier: &str) -> String {
        format!(
            "type=Nic::Interface,managed=true,mac={},ip={},subnet_id={},identifier={}",
            self.mac, self.ip, self.subnet_id, identifier
        )
    }
}

/// Configuration for creating a host
#[derive(Debug, Clone)]
pub struct CreateHostConfig {
    /// Short host name
    pub name: String,
    pub organization: String,
    pub location: String,
    pub hostgroup: String,
    pub domain: String,
    pub realm: String,
    pub puppet_environment_id: String,
    pub primary: HostInterface,
    /// Additional interfaces as (identifier, interface), e.g. ("eth1", ..)
    pub extra_interfaces: Vec<(String, HostInterface)>,
    pub partition_table: Option<String>,
    pub puppet_proxy: String,
    pub puppet_ca_proxy: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRunner;

    fn hammer(runner: &Arc<ScriptedRunner>, server: Option<&str>) -> Hammer {
        Hammer::new(
            runner.clone(),
            "/usr/bin/hammer",
            server.map(str::to_string),
        )
    }

    fn nic(ip: &str, mac: &str, subnet_id: &str) -> HostInterface {
        HostInterface {
            ip: ip.to_string(),
            mac: mac.to_string(),
            subnet_id: subnet_id.to_string(),
        }
    }

    #[test]
    fn test_interface_arg() {
        let arg = nic("10.1.2.3", "aa:bb:cc:dd:ee:ff", "7").interface_arg("eth1");
        assert_eq!(
            arg,
            "type=Nic::Interface,managed=true,mac=aa:bb:cc:dd:ee:ff,ip=10.1.2.3,subnet_id=7,identifier=eth1"
        );
    }

    #[tokio::test]
    async fn test_server_prefix() {
        let runner = Arc::new(ScriptedRunner::new());
        hammer(&runner, Some("sat.example.com"))
            .list_hosts()
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0].args,
            vec!["--server", "https://sat.example.com", "--csv", "host", "list"]
        );
    }

    #[tokio::test]
    async fn test_hostgroup_info_not_found_is_none() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("hammer", &["hostgroup", "info"], 65, "Could not find hostgroup");

        let info = hammer(&runner, None).hostgroup_info("hg-1").await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_list_failure_is_error() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("hammer", &["subnet", "list"], 70, "boom");

        assert!(hammer(&runner, None).list_subnets().await.is_err());
    }

    #[tokio::test]
    async fn test_child_hostgroup_args() {
        let runner = Arc::new(ScriptedRunner::new());
        let config = CreateHostGroupConfig {
            name: "hg-42-prod".to_string(),
            parent: "hg-42".to_string(),
            organization: "ACME".to_string(),
            location: "Berlin".to_string(),
            lifecycle_environment: Some("prod".to_string()),
            puppet_environment_id: Some("9".to_string()),
        };
        hammer(&runner, None).create_hostgroup(&config).await.unwrap();

        assert_eq!(
            runner.calls()[0].args,
            vec![
                "hostgroup",
                "create",
                "--name",
                "hg-42-prod",
                "--parent",
                "hg-42",
                "--lifecycle-environment",
                "prod",
                "--organizations",
                "ACME",
                "--environment-id",
                "9",
                "--locations",
                "Berlin",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_host_with_extra_interface() {
        let runner = Arc::new(ScriptedRunner::new());
        let config = CreateHostConfig {
            name: "web01".to_string(),
            organization: "ACME".to_string(),
            location: "Berlin".to_string(),
            hostgroup: "hg-42-prod".to_string(),
            domain: "example.com".to_string(),
            realm: "EXAMPLE.COM".to_string(),
            puppet_environment_id: "9".to_string(),
            primary: nic("10.0.0.5", "00:11:22:33:44:55", "3"),
            extra_interfaces: vec![("eth1".to_string(), nic("10.9.0.5", "00:11:22:33:44:66", "4"))],
            partition_table: None,
            puppet_proxy: "capsule.example.com".to_string(),
            puppet_ca_proxy: "ca.example.com".to_string(),
        };
        hammer(&runner, None).create_host(&config).await.unwrap();

        let call = &runner.calls()[0];
        assert!(call.contains(&["--name", "web01"]));
        assert!(call.contains(&["--subnet-id", "3"]));
        assert!(call.contains(&[
            "--interface",
            "type=Nic::Interface,managed=true,mac=00:11:22:33:44:66,ip=10.9.0.5,subnet_id=4,identifier=eth1",
        ]));
        assert!(!call.contains(&["--partition-table"]));
        assert_eq!(
            call.args[call.args.len() - 4..],
            ["--puppet-ca-proxy", "ca.example.com", "--puppet-proxy", "capsule.example.com"]
        );
    }
}

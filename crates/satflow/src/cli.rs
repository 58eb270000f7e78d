use clap::Parser;
use satflow_core::{NicInput, RunRequest};
use std::path::PathBuf;

pub const EXAMPLE: &str = "satflow --client-fqdn web01.example.com --location Berlin \\
    --application-id 42 --environment prod --application --intranet \\
    --primary-nic-ip 10.20.30.40 --primary-nic-mask 255.255.255.0 \\
    --primary-nic-gateway 10.20.30.1 --primary-nic-mac 00:11:22:33:44:55 \\
    --create-host";

#[derive(Parser, Debug)]
#[command(name = "satflow")]
#[command(version)]
#[command(about = "Provision a host in Satellite and group it in IPA", long_about = None)]
pub struct Cli {
    /// Satellite server FQDN (defaults to hammer's configured server)
    #[arg(long, value_name = "FQDN")]
    pub satellite_server: Option<String>,

    /// Fully-qualified name of the host to provision
    #[arg(long, value_name = "FQDN")]
    pub client_fqdn: Option<String>,

    /// Satellite location
    #[arg(long)]
    pub location: Option<String>,

    /// Application id; hostgroups are named hg-<id> and hg-<id>-<environment>
    #[arg(long, value_name = "ID")]
    pub application_id: Option<String>,

    /// Lifecycle environment, e.g. dev or prod
    #[arg(long)]
    pub environment: Option<String>,

    /// Partition table for the new host
    #[arg(long, value_name = "PTABLE")]
    pub partitioning: Option<String>,

    #[arg(long, value_name = "IP")]
    pub primary_nic_ip: Option<String>,
    #[arg(long, value_name = "MASK")]
    pub primary_nic_mask: Option<String>,
    #[arg(long, value_name = "IP")]
    pub primary_nic_gateway: Option<String>,
    #[arg(long, value_name = "MAC")]
    pub primary_nic_mac: Option<String>,

    /// Second interface (eth1), usually in-guest NFS storage
    #[arg(long, value_name = "IP")]
    pub secondary_nic_ip: Option<String>,
    #[arg(long, value_name = "MASK")]
    pub secondary_nic_mask: Option<String>,
    #[arg(long, value_name = "IP")]
    pub secondary_nic_gateway: Option<String>,
    #[arg(long, value_name = "MAC")]
    pub secondary_nic_mac: Option<String>,

    /// Third interface (eth2), usually database replication
    #[arg(long, value_name = "IP")]
    pub third_nic_ip: Option<String>,
    #[arg(long, value_name = "MASK")]
    pub third_nic_mask: Option<String>,
    #[arg(long, value_name = "IP")]
    pub third_nic_gateway: Option<String>,
    #[arg(long, value_name = "MAC")]
    pub third_nic_mac: Option<String>,

    /// Create the host record
    #[arg(long)]
    pub create_host: bool,

    /// Update an existing host record
    #[arg(long)]
    pub update_host: bool,

    /// Host lives in the intranet zone
    #[arg(long)]
    pub intranet: bool,

    /// Host lives in the DMZ
    #[arg(long)]
    pub dmz: bool,

    /// New hostgroups go under the application hostgroup
    #[arg(long)]
    pub application: bool,

    /// New hostgroups go under the infrastructure hostgroup
    #[arg(long)]
    pub infrastructure: bool,

    /// Print debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Site configuration file; must exist when given.
    /// Without it, SATFLOW_CONFIG_PATH is used if that file exists
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn into_request(self) -> (RunRequest, Option<PathBuf>) {
        let request = RunRequest {
            satellite_server: self.satellite_server,
            client_fqdn: self.client_fqdn,
            location: self.location,
            application_id: self.application_id,
            environment: self.environment,
            partitioning: self.partitioning,
            nics: [
                NicInput {
                    ip: self.primary_nic_ip,
                    mask: self.primary_nic_mask,
                    gateway: self.primary_nic_gateway,
                    mac: self.primary_nic_mac,
                },
                NicInput {
                    ip: self.secondary_nic_ip,
                    mask: self.secondary_nic_mask,
                    gateway: self.secondary_nic_gateway,
                    mac: self.secondary_nic_mac,
                },
                NicInput {
                    ip: self.third_nic_ip,
                    mask: self.third_nic_mask,
                    gateway: self.third_nic_gateway,
                    mac: self.third_nic_mac,
                },
            ],
            create_host: self.create_host,
            update_host: self.update_host,
            intranet: self.intranet,
            dmz: self.dmz,
            application: self.application,
            infrastructure: self.infrastructure,
            verbose: self.verbose,
        };
        (request, self.config)
    }
}

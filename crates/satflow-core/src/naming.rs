//! Canonical names derived from user-supplied identifiers

use crate::error::{ProvisionError, Result};
use std::net::Ipv4Addr;

/// Network address of the /24 containing `ip`: first three octets plus `.0`.
///
/// The interface mask is deliberately not consulted.
pub fn subnet_address(ip: &str) -> Result<String> {
    let addr: Ipv4Addr = ip
        .trim()
        .parse()
        .map_err(|_| ProvisionError::InvalidIp(ip.to_string()))?;
    let [a, b, c, _] = addr.octets();
    Ok(format!("{}.{}.{}.0", a, b, c))
}

/// Puppet environment label Katello generates for a content view:
/// `KT_<org>_<env>_<view>`, with dashes in org and view turned into underscores
pub fn puppet_environment_label(organization: &str, environment: &str, content_view: &str) -> String {
    format!(
        "KT_{}_{}_{}",
        organization.replace('-', "_"),
        environment,
        content_view.replace('-', "_")
    )
}

pub fn parent_hostgroup_name(application_id: &str) -> String {
    format!("hg-{}", application_id)
}

pub fn child_hostgroup_name(application_id: &str, environment: &str) -> String {
    format!("hg-{}-{}", application_id, environment)
}

pub fn iso_file_name(short_name: &str) -> String {
    format!("{}.iso", short_name)
}

/// A fully-qualified host name split into short name and domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostName {
    fqdn: String,
    short: String,
    domain: String,
}

impl HostName {
    pub fn parse(fqdn: &str) -> Result<Self> {
        let fqdn = fqdn.trim().trim_end_matches('.');
        let (short, domain) = fqdn.split_once('.').ok_or_else(|| {
            ProvisionError::Usage(format!(
                "client FQDN '{}' must contain a domain, e.g. client01.example.com",
                fqdn
            ))
        })?;

        if short.is_empty() || domain.split('.').any(str::is_empty) {
            return Err(ProvisionError::Usage(format!(
                "client FQDN '{}' contains an empty label",
                fqdn
            )));
        }

        Ok(Self {
            fqdn: fqdn.to_string(),
            short: short.to_string(),
            domain: domain.to_string(),
        })
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet_address_ignores_last_octet() {
        assert_eq!(subnet_address("10.20.30.40").unwrap(), "10.20.30.0");
        assert_eq!(subnet_address("192.168.1.255").unwrap(), "192.168.1.0");
    }

    #[test]
    fn test_subnet_address_rejects_garbage() {
        assert!(matches!(
            subnet_address("10.20.30"),
            Err(ProvisionError::InvalidIp(_))
        ));
        assert!(subnet_address("not-an-ip").is_err());
        assert!(subnet_address("10.20.30.400").is_err());
    }

    #[test]
    fn test_puppet_environment_label() {
        assert_eq!(
            puppet_environment_label("my-org", "prod", "my-view"),
            "KT_my_org_prod_my_view"
        );
    }

    #[test]
    fn test_puppet_environment_label_replaces_every_dash() {
        assert_eq!(
            puppet_environment_label("a-b-c", "dev", "cv-rhel-7-x"),
            "KT_a_b_c_dev_cv_rhel_7_x"
        );
    }

    #[test]
    fn test_hostgroup_names() {
        assert_eq!(parent_hostgroup_name("42"), "hg-42");
        assert_eq!(child_hostgroup_name("42", "prod"), "hg-42-prod");
    }

    #[test]
    fn test_host_name_parse() {
        let host = HostName::parse("client01.dc1.example.com").unwrap();
        assert_eq!(host.fqdn(), "client01.dc1.example.com");
        assert_eq!(host.short(), "client01");
        assert_eq!(host.domain(), "dc1.example.com");
        assert_eq!(iso_file_name(host.short()), "client01.iso");
    }

    #[test]
    fn test_host_name_requires_domain() {
        assert!(HostName::parse("client01").unwrap_err().is_usage());
        assert!(HostName::parse(".example.com").is_err());
        assert!(HostName::parse("client01..com").is_err());
    }
}

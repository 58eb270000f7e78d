//! Site configuration model
//!
//! Values that are fixed for a Satellite/IPA installation rather than for a
//! single host: organization, realm, proxies per network zone, Kerberos
//! service principal and so on.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_ACTIVATION_KEY_PARAMETER: &str = "kt_activation_keys";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub organization: String,
    pub realm: String,
    /// Content view the puppet environment label is derived from
    pub content_view: String,
    pub activation_key: String,
    #[serde(default = "default_activation_key_parameter")]
    pub activation_key_parameter: String,
    /// Primary DNS server for newly created subnets
    pub dns_primary: String,
    /// Directory (usually an NFS mount) receiving boot ISOs
    pub iso_store: PathBuf,
    #[serde(default)]
    pub initial_hostgroups: InitialHostGroups,
    #[serde(default)]
    pub zones: Zones,
    pub kerberos: KerberosSettings,
    #[serde(default)]
    pub tools: ToolPaths,
    #[serde(default)]
    pub probe: ProbeSettings,
}

fn default_activation_key_parameter() -> String {
    DEFAULT_ACTIVATION_KEY_PARAMETER.to_string()
}

impl SiteConfig {
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Reject settings every run depends on being empty
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("organization", &self.organization),
            ("realm", &self.realm),
            ("content_view", &self.content_view),
            ("activation_key", &self.activation_key),
            ("activation_key_parameter", &self.activation_key_parameter),
            ("dns_primary", &self.dns_primary),
            ("kerberos.principal", &self.kerberos.principal),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }

        if self.iso_store.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("iso_store must not be empty".to_string()));
        }

        if self.kerberos.fetch_keytab && self.kerberos.kdc.is_none() {
            return Err(ConfigError::Invalid(
                "kerberos.kdc is required when kerberos.fetch_keytab is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parent hostgroups new application hostgroups are created under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitialHostGroups {
    pub application: Option<String>,
    pub infrastructure: Option<String>,
}

/// Puppet proxy pair per network zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Zones {
    pub intranet: Option<ZoneProxies>,
    pub dmz: Option<ZoneProxies>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneProxies {
    pub puppet_proxy: String,
    pub puppet_ca_proxy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KerberosSettings {
    /// Service principal used for ipa calls
    pub principal: String,
    pub kdc: Option<String>,
    /// Defaults to `/home/<principal>/<principal>.keytab`
    pub keytab: Option<PathBuf>,
    /// Fetch a missing keytab with ipa-getkeytab instead of failing
    #[serde(default)]
    pub fetch_keytab: bool,
}

impl KerberosSettings {
    pub fn keytab_path(&self) -> PathBuf {
        self.keytab.clone().unwrap_or_else(|| {
            PathBuf::from("/home")
                .join(&self.principal)
                .join(format!("{}.keytab", self.principal))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    pub hammer: String,
    pub ipa: String,
    pub kinit: String,
    pub kdestroy: String,
    pub klist: String,
    pub ipa_getkeytab: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            hammer: "/usr/bin/hammer".to_string(),
            ipa: "/usr/bin/ipa".to_string(),
            kinit: "/usr/bin/kinit".to_string(),
            kdestroy: "/usr/bin/kdestroy".to_string(),
            klist: "/usr/bin/klist".to_string(),
            ipa_getkeytab: "/usr/sbin/ipa-getkeytab".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSettings {
    #[serde(default, rename = "match")]
    pub match_mode: MatchMode,
}

/// How listing rows are compared against a lookup key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Key occurs anywhere in the row
    #[default]
    Substring,
    /// Key equals the resource's name column
    Exact,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
organization: ACME-Corp
realm: EXAMPLE.COM
content_view: cv-rhel-7
activation_key: ak-rhel7
dns_primary: 10.0.0.53
iso_store: /mnt/iso
kerberos:
  principal: svc-sat
"#;

    #[test]
    fn test_minimal_defaults() {
        let config = SiteConfig::from_yaml_str(MINIMAL).unwrap();

        assert_eq!(config.activation_key_parameter, "kt_activation_keys");
        assert_eq!(config.tools.hammer, "/usr/bin/hammer");
        assert_eq!(config.tools.ipa_getkeytab, "/usr/sbin/ipa-getkeytab");
        assert_eq!(config.probe.match_mode, MatchMode::Substring);
        assert!(config.zones.intranet.is_none());
        assert!(!config.kerberos.fetch_keytab);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_keytab_path() {
        let config = SiteConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(
            config.kerberos.keytab_path(),
            PathBuf::from("/home/svc-sat/svc-sat.keytab")
        );
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
organization: ACME
realm: EXAMPLE.COM
content_view: cv
activation_key: ak
dns_primary: 10.0.0.53
iso_store: /mnt/iso
initial_hostgroups:
  application: hg-apps
zones:
  dmz:
    puppet_proxy: capsule-dmz.example.com
    puppet_ca_proxy: ca-dmz.example.com
kerberos:
  principal: svc
  kdc: ipa01.example.com
  keytab: /etc/svc.keytab
  fetch_keytab: true
tools:
  hammer: /opt/bin/hammer
probe:
  match: exact
"#;
        let config = SiteConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.initial_hostgroups.application.as_deref(), Some("hg-apps"));
        assert_eq!(
            config.zones.dmz.as_ref().map(|z| z.puppet_ca_proxy.as_str()),
            Some("ca-dmz.example.com")
        );
        assert_eq!(config.kerberos.keytab_path(), PathBuf::from("/etc/svc.keytab"));
        assert_eq!(config.tools.hammer, "/opt/bin/hammer");
        assert_eq!(config.tools.ipa, "/usr/bin/ipa");
        assert_eq!(config.probe.match_mode, MatchMode::Exact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_organization_rejected() {
        let yaml = MINIMAL.replace("ACME-Corp", "\"\"");
        let config = SiteConfig::from_yaml_str(&yaml).unwrap();

        match config.validate() {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("organization")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_fetch_keytab_requires_kdc() {
        let yaml = MINIMAL.replace("principal: svc-sat", "principal: svc-sat\n  fetch_keytab: true");
        let config = SiteConfig::from_yaml_str(&yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = format!("{}\nrelam: typo\n", MINIMAL);
        assert!(SiteConfig::from_yaml_str(&yaml).is_err());
    }
}

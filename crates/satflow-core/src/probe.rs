//! Existence checks against Satellite and IPA

use crate::error::Result;
use crate::tabular::Table;
use satflow_config::MatchMode;
use satflow_gateway::{Hammer, Ipa};

/// Satellite resource kinds the prober can look up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Organization,
    Location,
    LifecycleEnvironment,
    Subnet,
    HostGroup,
    Host,
    PuppetEnvironment,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "organization",
            ResourceKind::Location => "location",
            ResourceKind::LifecycleEnvironment => "lifecycle environment",
            ResourceKind::Subnet => "subnet",
            ResourceKind::HostGroup => "hostgroup",
            ResourceKind::Host => "host",
            ResourceKind::PuppetEnvironment => "puppet environment",
        }
    }

    /// Katello appends the content view version to puppet environment names,
    /// so those are always matched by substring
    fn match_mode(&self, configured: MatchMode) -> MatchMode {
        match self {
            ResourceKind::PuppetEnvironment => MatchMode::Substring,
            _ => configured,
        }
    }

    /// Column compared in exact match mode
    pub fn key_column(&self) -> &'static str {
        match self {
            ResourceKind::Subnet => "Network Addr",
            _ => "Name",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub struct Prober {
    hammer: Hammer,
    ipa: Ipa,
    organization: String,
    mode: MatchMode,
}

impl Prober {
    pub fn new(hammer: Hammer, ipa: Ipa, organization: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            hammer,
            ipa,
            organization: organization.into(),
            mode,
        }
    }

    /// Fetch the listing for `kind`. Hostgroups are looked up individually,
    /// so `key` selects the hostgroup for that kind.
    async fn listing(&self, kind: ResourceKind, key: &str) -> Result<Table> {
        let output = match kind {
            ResourceKind::Organization => self.hammer.list_organizations().await?,
            ResourceKind::Location => self.hammer.list_locations().await?,
            ResourceKind::LifecycleEnvironment => {
                self.hammer
                    .list_lifecycle_environments(&self.organization)
                    .await?
            }
            ResourceKind::Subnet => self.hammer.list_subnets().await?,
            ResourceKind::HostGroup => self.hammer.hostgroup_info(key).await?.unwrap_or_default(),
            ResourceKind::Host => self.hammer.list_hosts().await?,
            ResourceKind::PuppetEnvironment => self.hammer.list_environments().await?,
        };
        Ok(Table::parse(&output))
    }

    pub async fn exists(&self, kind: ResourceKind, key: &str) -> Result<bool> {
        let table = self.listing(kind, key).await?;
        let found = table.contains(key, kind.key_column(), kind.match_mode(self.mode));
        tracing::debug!("{} '{}' present: {}", kind, key, found);
        Ok(found)
    }

    /// Id of the first row matching `key`
    pub async fn resolve_id(&self, kind: ResourceKind, key: &str) -> Result<Option<String>> {
        let table = self.listing(kind, key).await?;
        Ok(table.id_of(key, kind.key_column(), kind.match_mode(self.mode)))
    }

    /// IPA hostgroups are judged by the exit status of `hostgroup-find`
    pub async fn directory_hostgroup_exists(&self, name: &str) -> Result<bool> {
        Ok(self.ipa.hostgroup_exists(name).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satflow_gateway::ScriptedRunner;
    use std::sync::Arc;

    fn prober(runner: &Arc<ScriptedRunner>, mode: MatchMode) -> Prober {
        Prober::new(
            Hammer::new(runner.clone(), "/usr/bin/hammer", None),
            Ipa::new(runner.clone(), "/usr/bin/ipa"),
            "ACME",
            mode,
        )
    }

    #[tokio::test]
    async fn test_organization_probe() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond(
            "hammer",
            &["organization", "list"],
            "Id,Title,Name,Description,Label\n1,ACME,ACME,,ACME\n",
        );
        let p = prober(&runner, MatchMode::Substring);

        assert!(p.exists(ResourceKind::Organization, "ACME").await.unwrap());
        assert!(!p.exists(ResourceKind::Organization, "Initech").await.unwrap());
    }

    #[tokio::test]
    async fn test_header_only_listing_is_absent() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond("hammer", &["location", "list"], "Id,Title,Name,Description\n");
        let p = prober(&runner, MatchMode::Substring);

        assert!(!p.exists(ResourceKind::Location, "Name").await.unwrap());
    }

    #[tokio::test]
    async fn test_lifecycle_query_scoped_to_organization() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond(
            "hammer",
            &["lifecycle-environment", "list", "--organization", "ACME"],
            "Id,Name,Prior\n1,Library,\n2,prod,Library\n",
        );
        let p = prober(&runner, MatchMode::Exact);

        assert!(p.exists(ResourceKind::LifecycleEnvironment, "prod").await.unwrap());
        assert!(!p.exists(ResourceKind::LifecycleEnvironment, "pro").await.unwrap());
    }

    #[tokio::test]
    async fn test_substring_false_positive_is_kept() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond(
            "hammer",
            &["host", "list"],
            "Id,Name,Operating System\n4,web01.example.com.old,RHEL 7\n",
        );

        let p = prober(&runner, MatchMode::Substring);
        assert!(p.exists(ResourceKind::Host, "web01.example.com").await.unwrap());

        let p = prober(&runner, MatchMode::Exact);
        assert!(!p.exists(ResourceKind::Host, "web01.example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_hostgroup_is_absent() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("hammer", &["hostgroup", "info"], 65, "Could not find hostgroup");
        let p = prober(&runner, MatchMode::Substring);

        assert!(!p.exists(ResourceKind::HostGroup, "hg-42").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_failure_is_fatal() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("hammer", &["organization", "list"], 70, "401 Unauthorized");
        let p = prober(&runner, MatchMode::Substring);

        assert!(p.exists(ResourceKind::Organization, "ACME").await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_puppet_environment_id() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond(
            "hammer",
            &["environment", "list"],
            "Id,Name\n1,production\n9,KT_ACME_prod_cv_rhel7_12\n",
        );
        let p = prober(&runner, MatchMode::Exact);

        assert_eq!(
            p.resolve_id(ResourceKind::PuppetEnvironment, "KT_ACME_prod_cv_rhel7")
                .await
                .unwrap(),
            Some("9".to_string())
        );
    }
}

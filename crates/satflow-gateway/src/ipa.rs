//! ipa CLI wrapper
//!
//! Directory-service (FreeIPA) hostgroup and automember commands. All calls
//! require a valid Kerberos ticket.

use crate::error::Result;
use crate::runner::{CommandRunner, owned_args, run_checked};
use std::sync::Arc;

/// ipa CLI wrapper
#[derive(Clone)]
pub struct Ipa {
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl Ipa {
    pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    async fn run_command(&self, args: &[&str]) -> Result<String> {
        run_checked(self.runner.as_ref(), &self.program, &owned_args(args)).await
    }

    /// Whether a hostgroup exists, judged only by the exit status of
    /// `ipa hostgroup-find`
    pub async fn hostgroup_exists(&self, name: &str) -> Result<bool> {
        let output = self
            .runner
            .run(&self.program, &owned_args(&["hostgroup-find", name]))
            .await?;
        Ok(output.is_success())
    }

    pub async fn add_hostgroup(&self, name: &str) -> Result<()> {
        self.run_command(&["hostgroup-add", name]).await?;
        Ok(())
    }

    /// Create a hostgroup automember rule named after the hostgroup
    pub async fn add_automember_rule(&self, hostgroup: &str) -> Result<()> {
        self.run_command(&["automember-add", "--type=hostgroup", hostgroup])
            .await?;
        Ok(())
    }

    pub async fn add_automember_condition(
        &self,
        hostgroup: &str,
        key: &str,
        inclusive_regex: &str,
    ) -> Result<()> {
        let key_arg = format!("--key={}", key);
        let regex_arg = format!("--inclusive-regex={}", inclusive_regex);
        self.run_command(&[
            "automember-add-condition",
            key_arg.as_str(),
            "--type=hostgroup",
            regex_arg.as_str(),
            hostgroup,
        ])
        .await?;
        Ok(())
    }

    pub async fn show_hostgroup(&self, name: &str) -> Result<DirectoryHostGroup> {
        let output = self.run_command(&["hostgroup-show", name]).await?;
        Ok(DirectoryHostGroup::parse(&output))
    }
}

/// Hostgroup as reported by `ipa hostgroup-show`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryHostGroup {
    pub name: String,
    pub members: Vec<String>,
}

impl DirectoryHostGroup {
    /// Parse `Key: value` lines; `Member hosts` is comma separated
    pub fn parse(output: &str) -> Self {
        let mut group = Self::default();

        for line in output.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            match key.trim() {
                "Host-group" => group.name = value.trim().to_string(),
                "Member hosts" => {
                    group.members = value
                        .split(',')
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                _ => {}
            }
        }

        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRunner;

    #[test]
    fn test_parse_hostgroup_show() {
        let output = "  Host-group: hg-42-prod\n  Description: hg-42-prod\n  Member hosts: web01.example.com, web02.example.com\n";
        let group = DirectoryHostGroup::parse(output);

        assert_eq!(group.name, "hg-42-prod");
        assert_eq!(group.members, vec!["web01.example.com", "web02.example.com"]);
    }

    #[test]
    fn test_parse_hostgroup_without_members() {
        let group = DirectoryHostGroup::parse("  Host-group: hg-1-dev\n");
        assert_eq!(group.name, "hg-1-dev");
        assert!(group.members.is_empty());
    }

    #[tokio::test]
    async fn test_hostgroup_exists_by_exit_status() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("ipa", &["hostgroup-find", "hg-missing"], 1, "0 hostgroups matched");
        let ipa = Ipa::new(runner.clone(), "/usr/bin/ipa");

        assert!(ipa.hostgroup_exists("hg-present").await.unwrap());
        assert!(!ipa.hostgroup_exists("hg-missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_automember_condition_args() {
        let runner = Arc::new(ScriptedRunner::new());
        let ipa = Ipa::new(runner.clone(), "/usr/bin/ipa");
        ipa.add_automember_condition("hg-42-prod", "userclass", "hg-42-prod")
            .await
            .unwrap();

        assert_eq!(
            runner.calls()[0].args,
            vec![
                "automember-add-condition",
                "--key=userclass",
                "--type=hostgroup",
                "--inclusive-regex=hg-42-prod",
                "hg-42-prod",
            ]
        );
    }
}

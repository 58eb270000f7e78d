//! Kerberos ticket tools (kinit, kdestroy, klist, ipa-getkeytab)

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner, owned_args, run_checked};
use std::path::Path;
use std::sync::Arc;

/// Paths of the Kerberos tools
#[derive(Debug, Clone)]
pub struct KerberosTools {
    pub kinit: String,
    pub kdestroy: String,
    pub klist: String,
    pub ipa_getkeytab: String,
}

#[derive(Clone)]
pub struct Kerberos {
    runner: Arc<dyn CommandRunner>,
    tools: KerberosTools,
}

impl Kerberos {
    pub fn new(runner: Arc<dyn CommandRunner>, tools: KerberosTools) -> Self {
        Self { runner, tools }
    }

    /// Destroy the current ticket cache. Returns whether kdestroy succeeded;
    /// there may simply have been no ticket.
    pub async fn destroy_ticket(&self) -> bool {
        match self.runner.run(&self.tools.kdestroy, &[]).await {
            Ok(output) => output.is_success(),
            Err(e) => {
                tracing::debug!("kdestroy failed: {}", e);
                false
            }
        }
    }

    /// Whether `klist` reports a valid ticket
    pub async fn has_valid_ticket(&self) -> Result<bool> {
        let output = self.runner.run(&self.tools.klist, &[]).await?;
        Ok(output.is_success())
    }

    /// `kinit -k -t <keytab> <principal>`. The raw output is returned so the
    /// caller can decide how to report a failed login.
    pub async fn kinit_with_keytab(&self, principal: &str, keytab: &Path) -> Result<CommandOutput> {
        let keytab = keytab.display().to_string();
        self.runner
            .run(
                &self.tools.kinit,
                &owned_args(&["-k", "-t", keytab.as_str(), principal]),
            )
            .await
    }

    pub async fn fetch_keytab(&self, kdc: &str, principal: &str, keytab: &Path) -> Result<()> {
        let keytab = keytab.display().to_string();
        run_checked(
            self.runner.as_ref(),
            &self.tools.ipa_getkeytab,
            &owned_args(&["-s", kdc, "-p", principal, "-k", keytab.as_str()]),
        )
        .await?;
        Ok(())
    }
}

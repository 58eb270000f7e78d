//! Kerberos credential bootstrap for the ipa calls

use crate::error::{ProvisionError, Result};
use satflow_config::KerberosSettings;
use satflow_gateway::Kerberos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    /// klist reported a ticket after the cache was destroyed
    ExistingTicket,
    /// A ticket was obtained with kinit from the keytab
    Acquired,
}

/// Make sure a valid ticket for the service principal is cached.
///
/// The cache is destroyed first so stale tickets never survive between runs.
/// A missing keytab is fatal unless `fetch_keytab` is enabled and the fetch
/// actually leaves a keytab on disk.
pub async fn bootstrap(kerberos: &Kerberos, settings: &KerberosSettings) -> Result<CredentialStatus> {
    if kerberos.destroy_ticket().await {
        tracing::debug!("destroyed existing Kerberos ticket cache");
    }

    let keytab = settings.keytab_path();
    if !tokio::fs::try_exists(&keytab).await.unwrap_or(false) {
        match settings.kdc.as_deref() {
            Some(kdc) if settings.fetch_keytab => {
                tracing::info!("fetching keytab {} from {}", keytab.display(), kdc);
                kerberos
                    .fetch_keytab(kdc, &settings.principal, &keytab)
                    .await?;
                if !tokio::fs::try_exists(&keytab).await.unwrap_or(false) {
                    return Err(ProvisionError::KeytabMissing(keytab));
                }
            }
            _ => return Err(ProvisionError::KeytabMissing(keytab)),
        }
    }

    if kerberos.has_valid_ticket().await? {
        tracing::info!("Kerberos ticket present");
        return Ok(CredentialStatus::ExistingTicket);
    }

    tracing::info!("requesting Kerberos ticket for {}", settings.principal);
    let output = kerberos
        .kinit_with_keytab(&settings.principal, &keytab)
        .await?;

    if !output.is_success() {
        return Err(ProvisionError::AuthenticationFailed {
            principal: settings.principal.clone(),
            reason: output.stderr.trim().to_string(),
        });
    }

    if !kerberos.has_valid_ticket().await? {
        return Err(ProvisionError::AuthenticationFailed {
            principal: settings.principal.clone(),
            reason: "kinit succeeded but klist still reports no ticket".to_string(),
        });
    }

    tracing::info!("obtained Kerberos ticket for {}", settings.principal);
    Ok(CredentialStatus::Acquired)
}

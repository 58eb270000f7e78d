use colored::Colorize;
use satflow_core::{CredentialStatus, NicSlot, ProvisionReport, RunConfig, StepOutcome};
use std::path::Path;

/// Echo the resolved run inputs (verbose mode)
pub fn print_run_config(config_path: &Path, config: &RunConfig) {
    println!("{}", "Run configuration:".bold());
    println!("  site config:       {}", config_path.display().to_string().cyan());
    if let Some(server) = &config.satellite_server {
        println!("  satellite server:  {}", server);
    }
    println!("  organization:      {}", config.site.organization);
    println!("  location:          {}", config.location);
    println!("  host:              {}", config.host.fqdn().cyan());
    println!("  domain:            {}", config.host.domain());
    println!("  hostgroup:         {}", config.child_hostgroup());
    println!("  puppet env label:  {}", config.puppet_environment_label());
    if let Some(ptable) = &config.partitioning {
        println!("  partition table:   {}", ptable);
    }
    if let Some(zone) = config.zone {
        println!("  network zone:      {}", zone.label());
    }
    if let Some(workload) = config.workload {
        println!("  workload class:    {}", workload.label());
    }

    for slot in NicSlot::ALL {
        let nic = config.nic(slot);
        if let Some(ip) = &nic.ip {
            println!(
                "  {} NIC ({}): {} mac={}",
                slot.label(),
                slot.identifier(),
                ip,
                nic.mac.as_deref().unwrap_or("-")
            );
        }
    }
    println!();
}

pub fn print_report(config: &RunConfig, report: &ProvisionReport) {
    println!();
    println!("{}", "Summary:".bold());
    for step in &report.steps {
        let outcome = match step.outcome {
            StepOutcome::Created => "created".green(),
            StepOutcome::Present => "present".normal(),
            StepOutcome::Skipped => "skipped".yellow(),
        };
        println!("  {:<20} {:<32} {}", step.resource, step.name, outcome);
    }

    if let Some(status) = report.credential {
        let label = match status {
            CredentialStatus::ExistingTicket => "existing ticket",
            CredentialStatus::Acquired => "ticket acquired",
        };
        println!("  {:<20} {:<32} {}", "kerberos", config.site.kerberos.principal, label);
    }

    if let Some(finished) = report.finished_at {
        let elapsed = finished - report.started_at;
        println!();
        println!(
            "{} {} in {}s",
            "✓".green(),
            config.host.fqdn().bold(),
            elapsed.num_seconds()
        );
    }
}

//! Cache and development mode commands

use tracing::info;

use crate::api::types::PurgeRequest;
use crate::api::DnsProvider;
use crate::cli::zones::get_zone;
use crate::error::{CliError, Result};
use crate::output::CommandOutput;

/// `purge [url...]`: purge the listed files, or everything when none given
pub async fn purge(
    provider: &dyn DnsProvider,
    domain: &str,
    files: &[String],
) -> Result<CommandOutput> {
    let zone = get_zone(provider, domain).await?;

    let request = if files.is_empty() {
        PurgeRequest::Everything {
            purge_everything: true,
        }
    } else {
        PurgeRequest::Files {
            files: files.to_vec(),
        }
    };

    let result = provider.purge_cache(&zone.id, &request).await?;
    info!("purged cache for {} ({} files)", zone.name, files.len());
    Ok(CommandOutput::Rows(vec![result]))
}

/// `devmode on|off`
pub async fn dev_mode(provider: &dyn DnsProvider, domain: &str, mode: &str) -> Result<CommandOutput> {
    if mode != "on" && mode != "off" {
        return Err(CliError::InvalidArgument(format!(
            "Development mode must be 'on' or 'off', got '{}'",
            mode
        )));
    }

    let zone = get_zone(provider, domain).await?;
    provider.set_development_mode(&zone.id, mode).await?;
    Ok(CommandOutput::message(format!("Dev mode changed to {}", mode)))
}

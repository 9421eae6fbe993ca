//! Zone commands and zone lookup

use serde_json::{json, Value};
use tracing::info;

use crate::api::pagination::{collect_all_pages, page_query};
use crate::api::types::{Filters, Zone};
use crate::api::DnsProvider;
use crate::error::{CliError, Result};
use crate::output::CommandOutput;

/// Resolve a domain name to its zone. Exactly one zone must match.
pub async fn get_zone(provider: &dyn DnsProvider, name: &str) -> Result<Zone> {
    let query = Filters::from([("name".to_string(), name.to_string())]);
    let mut zones = provider.find_zones(&query).await?.result;

    match zones.len() {
        0 => Err(CliError::ZoneNotFound(name.to_string())),
        1 => Ok(zones.remove(0)),
        count => Err(CliError::AmbiguousZone {
            name: name.to_string(),
            count,
        }),
    }
}

/// `zones`: every zone in the account
pub async fn list_zones(provider: &dyn DnsProvider) -> Result<CommandOutput> {
    let zones =
        collect_all_pages(|page| async move { provider.find_zones(&page_query(page)).await })
            .await?;

    let rows = zones
        .into_iter()
        .map(display_row)
        .collect::<Result<Vec<_>>>()?;
    Ok(CommandOutput::Rows(rows))
}

/// Zone with its plan name lifted to the top level for the table
fn display_row(zone: Zone) -> Result<Value> {
    let plan_name = zone.plan.as_ref().map(|p| p.name.clone());
    let mut row = serde_json::to_value(zone)?;
    row["planName"] = json!(plan_name);
    Ok(row)
}

/// `addzone <name>`
pub async fn add_zone(provider: &dyn DnsProvider, name: &str) -> Result<CommandOutput> {
    let zone = provider.add_zone(name).await?;
    info!("created zone {} ({})", zone.name, zone.id);
    Ok(CommandOutput::message(format!(
        "Added zone {} (id: {})",
        zone.name, zone.id
    )))
}

/// `rmzone <name>`
pub async fn remove_zone(provider: &dyn DnsProvider, name: &str) -> Result<CommandOutput> {
    let zone = get_zone(provider, name).await?;
    let deleted = provider.remove_zone(&zone.id).await?;
    info!("deleted zone {} ({})", zone.name, deleted.id);
    Ok(CommandOutput::message(format!(
        "Removed zone {} (id: {})",
        zone.name, deleted.id
    )))
}

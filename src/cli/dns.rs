//! DNS record commands
//!
//! `find` is the shared lookup. `edit` (and the enable/disable wrappers)
//! refuse to touch more than one record; `rm` deletes every match.

use futures::future::try_join_all;
use serde_json::{json, Value};
use tracing::info;

use crate::api::pagination::{collect_all_pages, page_query};
use crate::api::types::{DnsRecord, Filters, RecordPayload, SrvData, Zone, AUTO_TTL};
use crate::api::DnsProvider;
use crate::cli::zones::get_zone;
use crate::cli::{Invocation, SrvOverrides};
use crate::error::{CliError, Result};
use crate::output::CommandOutput;

const DEFAULT_RECORD_TYPE: &str = "CNAME";

/// Arguments shared by every record command
#[derive(Debug, Clone, Default)]
pub struct RecordArgs {
    pub domain: String,
    pub name: Option<String>,
    pub content: Option<String>,
    pub record_type: Option<String>,
    pub ttl: Option<u32>,
    pub priority: Option<u16>,
    pub activate: Option<bool>,
    pub query: Filters,
    pub srv: SrvOverrides,
}

impl RecordArgs {
    pub fn from_invocation(inv: &Invocation) -> Result<Self> {
        let domain = inv
            .options
            .domain
            .clone()
            .ok_or_else(|| CliError::MissingOptions(vec!["domain".to_string()]))?;

        Ok(Self {
            domain,
            name: inv.param("name").map(str::to_string),
            content: inv.param("content").map(str::to_string),
            record_type: inv.options.record_type.clone(),
            ttl: inv.options.ttl,
            priority: inv.options.priority,
            activate: inv.options.activate,
            query: inv.query.clone(),
            srv: inv.options.srv.clone(),
        })
    }

    /// Lookup filters from name/type (and content when `with_content`),
    /// overlaid with the `--query` pairs.
    fn filters(&self, with_content: bool) -> Filters {
        let mut filters = Filters::new();
        if let Some(name) = &self.name {
            filters.insert("name".into(), name.clone());
        }
        if let Some(record_type) = &self.record_type {
            filters.insert("type".into(), record_type.clone());
        }
        if with_content {
            if let Some(content) = &self.content {
                filters.insert("content".into(), content.clone());
            }
        }
        filters.extend(self.query.clone());
        if !with_content {
            filters.remove("content");
        }
        filters
    }
}

/// Provider-side fields derived from the CLI arguments
#[derive(Debug, Default, PartialEq)]
struct RecordChanges {
    content: Option<String>,
    proxied: Option<bool>,
    priority: Option<u16>,
    data: Option<SrvData>,
}

/// Translate CLI vocabulary into provider fields: SRV name/content become a
/// structured `data` object and `activate` becomes `proxied`.
///
/// `name` is the owner the SRV fields are split from: the typed name on add,
/// the matched record's full name on edit.
fn map_record_options(
    args: &RecordArgs,
    name: Option<&str>,
    record_type: &str,
) -> Result<RecordChanges> {
    let mut changes = RecordChanges {
        content: args.content.clone(),
        proxied: args.activate,
        priority: args.priority,
        data: None,
    };

    if record_type.eq_ignore_ascii_case("SRV") {
        if let (Some(name), Some(content)) = (name, &args.content) {
            let data = SrvData::parse(name, content, &args.domain).map_err(CliError::InvalidArgument)?;
            changes.data = Some(apply_srv_overrides(data, &args.srv));
            changes.content = None;
            changes.priority = None;
        }
    }

    Ok(changes)
}

fn apply_srv_overrides(mut data: SrvData, srv: &SrvOverrides) -> SrvData {
    if let Some(service) = &srv.service {
        data.service = service.clone();
    }
    if let Some(proto) = &srv.proto {
        data.proto = proto.clone();
    }
    if let Some(name) = &srv.name {
        data.name = name.clone();
    }
    if let Some(priority) = srv.priority {
        data.priority = priority;
    }
    if let Some(weight) = srv.weight {
        data.weight = weight;
    }
    if let Some(port) = srv.port {
        data.port = port;
    }
    if let Some(target) = &srv.target {
        data.target = target.clone();
    }
    data
}

/// Resolve the zone and search it. Short names get the domain appended.
pub async fn find(
    provider: &dyn DnsProvider,
    domain: &str,
    mut query: Filters,
) -> Result<(Zone, Vec<DnsRecord>)> {
    if let Some(name) = query.get_mut("name") {
        if !name.contains(domain) {
            *name = format!("{}.{}", name, domain);
        }
    }

    let zone = get_zone(provider, domain).await?;
    let page = provider.find_records(&zone.id, &query).await?;
    Ok((zone, page.result))
}

/// `add <name> <content...>`
pub async fn add(provider: &dyn DnsProvider, args: &RecordArgs) -> Result<CommandOutput> {
    let missing: Vec<String> = [("name", &args.name), ("content", &args.content)]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CliError::MissingParameters(missing));
    }

    let record_type = args
        .record_type
        .clone()
        .unwrap_or_else(|| DEFAULT_RECORD_TYPE.to_string());
    let changes = map_record_options(args, args.name.as_deref(), &record_type)?;

    let payload = RecordPayload {
        record_type,
        name: args.name.clone().unwrap_or_default(),
        content: changes.content,
        ttl: args.ttl.unwrap_or(AUTO_TTL),
        proxied: changes.proxied,
        priority: changes.priority,
        data: changes.data,
    };

    let zone = get_zone(provider, &args.domain).await?;
    let record = provider.add_record(&zone.id, &payload).await?;
    info!("created record {} in zone {}", record.id, zone.id);

    Ok(CommandOutput::message(format!(
        "Added {} record {} -> {}",
        record.record_type, record.name, record.content
    )))
}

/// `edit <name> <content>`; exactly one record must match
pub async fn edit(provider: &dyn DnsProvider, args: &RecordArgs) -> Result<CommandOutput> {
    let (zone, mut records) = find(provider, &args.domain, args.filters(false)).await?;

    let record = match records.len() {
        0 => return Err(CliError::NoMatchingRecords),
        1 => records.remove(0),
        n => return Err(CliError::AmbiguousRecords(n)),
    };

    let record_type = args
        .record_type
        .clone()
        .unwrap_or_else(|| record.record_type.clone());
    let changes = map_record_options(args, Some(record.name.as_str()), &record_type)?;

    let payload = RecordPayload {
        record_type,
        name: record.name.clone(),
        content: match changes.data {
            Some(_) => None,
            None => Some(changes.content.unwrap_or(record.content)),
        },
        ttl: args.ttl.unwrap_or(record.ttl),
        proxied: Some(changes.proxied.unwrap_or(record.proxied)),
        priority: changes.priority.or(record.priority),
        data: changes.data,
    };

    let updated = provider.edit_record(&zone.id, &record.id, &payload).await?;
    info!("updated record {} in zone {}", updated.id, zone.id);

    Ok(CommandOutput::message(format!(
        "Updated {} record {} (id: {})",
        updated.record_type, updated.name, updated.id
    )))
}

/// `enable <name>`: turn proxying on for one record
pub async fn enable_proxy(provider: &dyn DnsProvider, args: &RecordArgs) -> Result<CommandOutput> {
    let args = RecordArgs {
        activate: Some(true),
        ..args.clone()
    };
    edit(provider, &args).await
}

/// `disable <name>`: turn proxying off for one record
pub async fn disable_proxy(provider: &dyn DnsProvider, args: &RecordArgs) -> Result<CommandOutput> {
    let args = RecordArgs {
        activate: Some(false),
        ..args.clone()
    };
    edit(provider, &args).await
}

/// `rm <name> [content]`: delete every matching record
pub async fn remove(provider: &dyn DnsProvider, args: &RecordArgs) -> Result<CommandOutput> {
    if args.name.is_none() {
        return Err(CliError::MissingName);
    }

    let (zone, records) = find(provider, &args.domain, args.filters(true)).await?;
    if records.is_empty() {
        return Err(CliError::NoMatchingRecords);
    }

    let deletions = records.iter().map(|record| {
        let zone_id = zone.id.as_str();
        async move {
            let deleted = provider.remove_record(zone_id, &record.id).await?;
            info!("deleted {} record {} ({})", record.record_type, record.name, deleted.id);
            Ok::<_, CliError>(deleted)
        }
    });
    let deleted = try_join_all(deletions).await?;

    Ok(CommandOutput::Messages(
        deleted
            .into_iter()
            .map(|d| format!("Deleted record with id {}", d.id))
            .collect(),
    ))
}

/// `find <name> [content]`: matching records as rows
pub async fn find_record(provider: &dyn DnsProvider, args: &RecordArgs) -> Result<CommandOutput> {
    let (_, records) = find(provider, &args.domain, args.filters(true)).await?;
    let rows = records
        .into_iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(CommandOutput::Rows(rows))
}

/// `ls`: every record in the zone, across all pages
pub async fn list_records(provider: &dyn DnsProvider, domain: &str) -> Result<CommandOutput> {
    let zone = get_zone(provider, domain).await?;
    let zone_id = zone.id.as_str();
    let records = collect_all_pages(|page| async move {
        provider.find_records(zone_id, &page_query(page)).await
    })
    .await?;

    let rows = records
        .into_iter()
        .map(display_row)
        .collect::<Result<Vec<_>>>()?;
    Ok(CommandOutput::Rows(rows))
}

/// Record as a display row, with the automatic TTL spelled out
fn display_row(record: DnsRecord) -> Result<Value> {
    let auto = record.ttl == AUTO_TTL;
    let mut row = serde_json::to_value(record)?;
    if auto {
        row["ttl"] = json!("Auto");
    }
    Ok(row)
}

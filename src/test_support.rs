//! Test doubles: an in-memory provider and a log capture

use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::api::pagination::PER_PAGE;
use crate::api::response::ApiError;
use crate::api::types::{
    Deleted, DnsRecord, Filters, Page, PurgeRequest, RecordPayload, Zone, ZonePlan, AUTO_TTL,
};
use crate::api::DnsProvider;
use crate::error::{CliError, Result};

/// Log lines captured on the current thread while the guard is alive
pub struct CapturedLogs {
    buffer: LogBuffer,
    _guard: DefaultGuard,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let bytes = self.buffer.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route `tracing` output on this thread into a buffer. `#[tokio::test]`
/// runs on a single thread, so async code is captured too.
pub fn capture_logs() -> CapturedLogs {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(buffer.clone())
        .finish();
    CapturedLogs {
        buffer,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}

/// Every provider call, in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindZones(Filters),
    AddZone(String),
    RemoveZone(String),
    FindRecords(String, Filters),
    AddRecord(String, RecordPayload),
    EditRecord(String, String, RecordPayload),
    RemoveRecord(String, String),
    Purge(String, PurgeRequest),
    DevMode(String, String),
}

pub fn record(id: &str, record_type: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        zone_id: None,
        record_type: record_type.to_string(),
        name: name.to_string(),
        content: content.to_string(),
        ttl: AUTO_TTL,
        proxied: false,
        priority: None,
        data: None,
        extra: Map::new(),
    }
}

fn zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
        status: Some("active".to_string()),
        plan: Some(ZonePlan {
            name: "Free Website".to_string(),
            extra: Map::new(),
        }),
        account: None,
        extra: Map::new(),
    }
}

#[derive(Default)]
pub struct MockProvider {
    zones: Mutex<Vec<Zone>>,
    records: Mutex<Vec<DnsRecord>>,
    calls: Mutex<Vec<Call>>,
    failing_deletes: HashSet<String>,
    next_id: AtomicU32,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, id: &str, name: &str) -> Self {
        self.zones.get_mut().push(zone(id, name));
        self
    }

    pub fn with_record(mut self, zone_id: &str, mut record: DnsRecord) -> Self {
        record.zone_id = Some(zone_id.to_string());
        self.records.get_mut().push(record);
        self
    }

    /// Make deleting this record id fail with a provider error
    pub fn failing_delete(mut self, record_id: &str) -> Self {
        self.failing_deletes.insert(record_id.to_string());
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().await.iter().filter(|c| pred(c)).count()
    }

    async fn record_call(&self, call: Call) {
        self.calls.lock().await.push(call);
    }

    fn generate_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn zone_name(&self, zone_id: &str) -> Result<String> {
        self.zones
            .lock()
            .await
            .iter()
            .find(|z| z.id == zone_id)
            .map(|z| z.name.clone())
            .ok_or_else(|| not_found(zone_id))
    }
}

fn not_found(id: &str) -> CliError {
    CliError::Provider(vec![ApiError {
        code: 1001,
        message: format!("{} not found", id),
    }])
}

/// Slice out one page when the query asks for one, else return everything
fn paginate<T>(rows: Vec<T>, query: &Filters) -> Page<T> {
    let Some(page) = query.get("page").and_then(|p| p.parse::<usize>().ok()) else {
        return Page {
            result: rows,
            total_pages: None,
        };
    };

    let per_page = PER_PAGE as usize;
    let total_pages = rows.len().div_ceil(per_page).max(1) as u32;
    let result = rows
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    Page {
        result,
        total_pages: Some(total_pages),
    }
}

fn record_matches(record: &DnsRecord, query: &Filters) -> bool {
    let field = |key: &str| match key {
        "name" => Some(&record.name),
        "type" => Some(&record.record_type),
        "content" => Some(&record.content),
        _ => None,
    };
    ["name", "type", "content"]
        .iter()
        .all(|key| match (query.get(*key), field(*key)) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        })
}

fn stored(id: String, zone_id: &str, name: String, payload: &RecordPayload) -> DnsRecord {
    DnsRecord {
        id,
        zone_id: Some(zone_id.to_string()),
        record_type: payload.record_type.clone(),
        name,
        content: payload.content.clone().unwrap_or_default(),
        ttl: payload.ttl,
        proxied: payload.proxied.unwrap_or(false),
        priority: payload.priority,
        data: payload.data.as_ref().map(|d| json!(d)),
        extra: Map::new(),
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    async fn find_zones(&self, query: &Filters) -> Result<Page<Zone>> {
        self.record_call(Call::FindZones(query.clone())).await;
        let zones: Vec<Zone> = self
            .zones
            .lock()
            .await
            .iter()
            .filter(|z| query.get("name").map_or(true, |name| &z.name == name))
            .cloned()
            .collect();
        Ok(paginate(zones, query))
    }

    async fn add_zone(&self, name: &str) -> Result<Zone> {
        self.record_call(Call::AddZone(name.to_string())).await;
        let created = zone(&self.generate_id("zone"), name);
        self.zones.lock().await.push(created.clone());
        Ok(created)
    }

    async fn remove_zone(&self, zone_id: &str) -> Result<Deleted> {
        self.record_call(Call::RemoveZone(zone_id.to_string())).await;
        let mut zones = self.zones.lock().await;
        let before = zones.len();
        zones.retain(|z| z.id != zone_id);
        if zones.len() == before {
            return Err(not_found(zone_id));
        }
        Ok(Deleted {
            id: zone_id.to_string(),
        })
    }

    async fn find_records(&self, zone_id: &str, query: &Filters) -> Result<Page<DnsRecord>> {
        self.record_call(Call::FindRecords(zone_id.to_string(), query.clone()))
            .await;
        let records: Vec<DnsRecord> = self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| r.zone_id.as_deref() == Some(zone_id))
            .filter(|r| record_matches(r, query))
            .cloned()
            .collect();
        Ok(paginate(records, query))
    }

    async fn add_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<DnsRecord> {
        self.record_call(Call::AddRecord(zone_id.to_string(), payload.clone()))
            .await;
        let zone_name = self.zone_name(zone_id).await?;
        let name = if payload.name.ends_with(&zone_name) {
            payload.name.clone()
        } else {
            format!("{}.{}", payload.name, zone_name)
        };

        let created = stored(self.generate_id("rec"), zone_id, name, payload);
        self.records.lock().await.push(created.clone());
        Ok(created)
    }

    async fn edit_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord> {
        self.record_call(Call::EditRecord(
            zone_id.to_string(),
            record_id.to_string(),
            payload.clone(),
        ))
        .await;
        let mut records = self.records.lock().await;
        let existing = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| not_found(record_id))?;
        *existing = stored(record_id.to_string(), zone_id, payload.name.clone(), payload);
        Ok(existing.clone())
    }

    async fn remove_record(&self, zone_id: &str, record_id: &str) -> Result<Deleted> {
        self.record_call(Call::RemoveRecord(
            zone_id.to_string(),
            record_id.to_string(),
        ))
        .await;
        if self.failing_deletes.contains(record_id) {
            return Err(CliError::Provider(vec![ApiError {
                code: 81044,
                message: format!("Record {} could not be deleted", record_id),
            }]));
        }
        self.records.lock().await.retain(|r| r.id != record_id);
        Ok(Deleted {
            id: record_id.to_string(),
        })
    }

    async fn purge_cache(&self, zone_id: &str, request: &PurgeRequest) -> Result<Value> {
        self.record_call(Call::Purge(zone_id.to_string(), request.clone()))
            .await;
        Ok(json!({ "id": zone_id }))
    }

    async fn set_development_mode(&self, zone_id: &str, mode: &str) -> Result<Value> {
        self.record_call(Call::DevMode(zone_id.to_string(), mode.to_string()))
            .await;
        Ok(json!({ "id": "development_mode", "value": mode }))
    }
}

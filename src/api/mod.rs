//! Provider API module

pub mod client;
pub mod pagination;
pub mod response;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use types::{Deleted, DnsRecord, Filters, Page, PurgeRequest, RecordPayload, Zone};

pub use client::CloudflareClient;

/// The calls the command layer makes against the provider.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    async fn find_zones(&self, query: &Filters) -> Result<Page<Zone>>;

    async fn add_zone(&self, name: &str) -> Result<Zone>;

    async fn remove_zone(&self, zone_id: &str) -> Result<Deleted>;

    async fn find_records(&self, zone_id: &str, query: &Filters) -> Result<Page<DnsRecord>>;

    async fn add_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<DnsRecord>;

    async fn edit_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord>;

    async fn remove_record(&self, zone_id: &str, record_id: &str) -> Result<Deleted>;

    async fn purge_cache(&self, zone_id: &str, request: &PurgeRequest) -> Result<Value>;

    async fn set_development_mode(&self, zone_id: &str, mode: &str) -> Result<Value>;
}

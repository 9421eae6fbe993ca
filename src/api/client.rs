//! HTTP client for Cloudflare API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::api::response::ApiResponse;
use crate::api::types::{Deleted, DnsRecord, Filters, Page, PurgeRequest, RecordPayload, Zone};
use crate::api::DnsProvider;
use crate::error::{CliError, Result};

const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How requests authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Scoped API token, sent as a bearer token
    Token(String),
    /// Global API key paired with the account email
    GlobalKey { email: String, key: String },
}

impl Credentials {
    /// Email present means global key auth; otherwise the secret is a token.
    pub fn new(token: &str, email: Option<&str>) -> Self {
        match email {
            Some(email) => Self::GlobalKey {
                email: email.to_string(),
                key: token.to_string(),
            },
            None => Self::Token(token.to_string()),
        }
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Token(token) => vec![("Authorization", format!("Bearer {}", token))],
            Self::GlobalKey { email, key } => {
                vec![("X-Auth-Key", key.clone()), ("X-Auth-Email", email.clone())]
            }
        }
    }
}

/// Cloudflare API client
pub struct CloudflareClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl CloudflareClient {
    /// Create a new Cloudflare API client
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_base_url(credentials, CF_API_BASE)
    }

    /// Client against another API root, e.g. a local mock server
    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cfcli/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Build request with authentication headers
    fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, url);

        for (key, value) in self.credentials.headers() {
            req = req.header(key, value);
        }

        req
    }

    /// Send a request and unwrap the API envelope
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;
        trace!("Response ({}): {}", status, text);

        // Error bodies usually still carry the envelope; prefer its messages.
        if !status.is_success() {
            return match serde_json::from_str::<ApiResponse<Value>>(&text) {
                Ok(envelope) if !envelope.errors.is_empty() => {
                    Err(CliError::Provider(envelope.errors))
                }
                _ => Err(CliError::Http {
                    status: status.as_u16(),
                    body: text,
                }),
            };
        }

        let api_response: ApiResponse<T> = serde_json::from_str(&text)?;

        if !api_response.success {
            return Err(CliError::Provider(api_response.errors));
        }

        Ok(api_response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &Filters) -> Result<ApiResponse<T>> {
        debug!("GET {} {:?}", path, query);
        self.send(self.build_request(Method::GET, path).query(query))
            .await
    }

    async fn with_body<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("{} {} with body: {}", method, path, serde_json::to_string(body)?);
        }
        self.send(self.build_request(method, path).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        debug!("DELETE {}", path);
        self.send(self.build_request(Method::DELETE, path)).await
    }
}

/// Pull `result` out of a single-object response
fn single<T>(response: ApiResponse<T>) -> Result<T> {
    response.result.ok_or(CliError::MissingResult)
}

fn page<T>(response: ApiResponse<Vec<T>>) -> Page<T> {
    let total_pages = response.total_pages();
    Page {
        result: response.result.unwrap_or_default(),
        total_pages,
    }
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    async fn find_zones(&self, query: &Filters) -> Result<Page<Zone>> {
        Ok(page(self.get("/zones", query).await?))
    }

    async fn add_zone(&self, name: &str) -> Result<Zone> {
        single(
            self.with_body(Method::POST, "/zones", &json!({ "name": name }))
                .await?,
        )
    }

    async fn remove_zone(&self, zone_id: &str) -> Result<Deleted> {
        single(self.delete(&format!("/zones/{}", zone_id)).await?)
    }

    async fn find_records(&self, zone_id: &str, query: &Filters) -> Result<Page<DnsRecord>> {
        Ok(page(
            self.get(&format!("/zones/{}/dns_records", zone_id), query)
                .await?,
        ))
    }

    async fn add_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<DnsRecord> {
        single(
            self.with_body(
                Method::POST,
                &format!("/zones/{}/dns_records", zone_id),
                payload,
            )
            .await?,
        )
    }

    async fn edit_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord> {
        single(
            self.with_body(
                Method::PUT,
                &format!("/zones/{}/dns_records/{}", zone_id, record_id),
                payload,
            )
            .await?,
        )
    }

    async fn remove_record(&self, zone_id: &str, record_id: &str) -> Result<Deleted> {
        single(
            self.delete(&format!("/zones/{}/dns_records/{}", zone_id, record_id))
                .await?,
        )
    }

    async fn purge_cache(&self, zone_id: &str, request: &PurgeRequest) -> Result<Value> {
        let response: ApiResponse<Value> = self
            .with_body(
                Method::POST,
                &format!("/zones/{}/purge_cache", zone_id),
                request,
            )
            .await?;
        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn set_development_mode(&self, zone_id: &str, mode: &str) -> Result<Value> {
        let response: ApiResponse<Value> = self
            .with_body(
                Method::PATCH,
                &format!("/zones/{}/settings/development_mode", zone_id),
                &json!({ "value": mode }),
            )
            .await?;
        Ok(response.result.unwrap_or(Value::Null))
    }
}

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Serialize;

use super::domain::ContactRecord;

/// PostgREST table the site has always written to.
const CONTACT_TABLE: &str = "contact_requests";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Supabase URL or service-role key is absent from the deployment.
    #[error("Supabase no configurado")]
    Unconfigured,
    /// The insert was attempted and failed; carries the store's own detail.
    #[error("No se pudo guardar en Supabase: {0}")]
    Write(String),
}

/// Persists one validated submission. At-most-once, no retry.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, record: &ContactRecord) -> Result<(), StoreError>;
}

/// Row shape of `contact_requests`; column names are the table's Spanish
/// originals, so the record's canonical fields are mapped here and nowhere
/// else. `empresa` serializes as `null` when absent.
#[derive(Debug, Serialize)]
struct ContactRow<'a> {
    nombre: &'a str,
    email: &'a str,
    empresa: Option<&'a str>,
    mensaje: &'a str,
    created_at: String,
}

impl<'a> ContactRow<'a> {
    fn from_record(record: &'a ContactRecord) -> Self {
        Self {
            nombre: &record.request.name,
            email: &record.request.email,
            empresa: record.request.company.as_deref(),
            mensaje: &record.request.message,
            created_at: record
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Live store inserting rows through the Supabase REST endpoint.
pub struct SupabaseStore {
    base_url: Option<String>,
    service_role: Option<String>,
    http: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(
        base_url: Option<String>,
        service_role: Option<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url,
            service_role,
            http,
        }
    }
}

#[async_trait]
impl ContactStore for SupabaseStore {
    async fn insert(&self, record: &ContactRecord) -> Result<(), StoreError> {
        let (base_url, key) = match (self.base_url.as_deref(), self.service_role.as_deref()) {
            (Some(url), Some(key)) => (url, key),
            _ => return Err(StoreError::Unconfigured),
        };

        let url = format!("{}/rest/v1/{CONTACT_TABLE}", base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=minimal")
            .json(&ContactRow::from_record(record))
            .send()
            .await
            .map_err(|err| StoreError::Write(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(StoreError::Write(detail));
        }
        Ok(())
    }
}

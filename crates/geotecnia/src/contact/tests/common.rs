use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::contact::domain::{ContactRecord, ContactSubmission, VerificationOutcome};
use crate::contact::notifier::{compose_emails, ContactNotifier, NotificationError, OutboundEmail};
use crate::contact::store::{ContactStore, StoreError};
use crate::contact::verification::{BotVerifier, VerificationError};
use crate::contact::{contact_router, ContactIntakeService};

pub(super) const FROM_EMAIL: &str = "no-reply@geotecniayservicios.es";
pub(super) const TO_EMAIL: &str = "geotecniayservicios@gmail.com";

pub(super) fn submission() -> ContactSubmission {
    ContactSubmission {
        name: "Juan Perez".to_string(),
        email: "juan@example.com".to_string(),
        company: Some("ACME".to_string()),
        message: "Hola, necesito un servicio geotecnico.".to_string(),
        token: Some("client-token".to_string()),
        website: None,
    }
}

/// Verifier double answering every carried token with a fixed outcome. A
/// missing or blank token errors exactly like the live client.
#[derive(Clone)]
pub(super) struct StaticVerifier {
    outcome: VerificationOutcome,
    calls: Arc<Mutex<Vec<Option<String>>>>,
}

impl StaticVerifier {
    pub(super) fn accepting() -> Self {
        Self::with_outcome(VerificationOutcome {
            accepted: true,
            score: Some(0.9),
        })
    }

    pub(super) fn with_outcome(outcome: VerificationOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.lock().expect("verifier mutex poisoned").len()
    }
}

#[async_trait]
impl BotVerifier for StaticVerifier {
    async fn verify(
        &self,
        token: Option<&str>,
    ) -> Result<VerificationOutcome, VerificationError> {
        self.calls
            .lock()
            .expect("verifier mutex poisoned")
            .push(token.map(str::to_string));
        match token.map(str::trim).filter(|value| !value.is_empty()) {
            Some(_) => Ok(self.outcome),
            None => Err(VerificationError::MissingToken),
        }
    }
}

pub(super) struct UnreachableVerifier;

#[async_trait]
impl BotVerifier for UnreachableVerifier {
    async fn verify(
        &self,
        _token: Option<&str>,
    ) -> Result<VerificationOutcome, VerificationError> {
        Err(VerificationError::Unreachable(
            "connection refused".to_string(),
        ))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    rows: Arc<Mutex<Vec<ContactRecord>>>,
}

impl MemoryStore {
    pub(super) fn rows(&self) -> Vec<ContactRecord> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert(&self, record: &ContactRecord) -> Result<(), StoreError> {
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(())
    }
}

pub(super) struct UnconfiguredStore;

#[async_trait]
impl ContactStore for UnconfiguredStore {
    async fn insert(&self, _record: &ContactRecord) -> Result<(), StoreError> {
        Err(StoreError::Unconfigured)
    }
}

pub(super) struct FailingStore;

#[async_trait]
impl ContactStore for FailingStore {
    async fn insert(&self, _record: &ContactRecord) -> Result<(), StoreError> {
        Err(StoreError::Write("duplicate key value".to_string()))
    }
}

/// Notifier double capturing the same two messages the live notifier would
/// send, in order.
#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    emails: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl MemoryNotifier {
    pub(super) fn emails(&self) -> Vec<OutboundEmail> {
        self.emails.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl ContactNotifier for MemoryNotifier {
    async fn notify(&self, record: &ContactRecord) -> Result<(), NotificationError> {
        let pair = compose_emails(record, FROM_EMAIL, TO_EMAIL);
        self.emails
            .lock()
            .expect("notifier mutex poisoned")
            .extend(pair);
        Ok(())
    }
}

pub(super) struct UnconfiguredNotifier;

#[async_trait]
impl ContactNotifier for UnconfiguredNotifier {
    async fn notify(&self, _record: &ContactRecord) -> Result<(), NotificationError> {
        Err(NotificationError::Unconfigured)
    }
}

pub(super) struct FailingNotifier;

#[async_trait]
impl ContactNotifier for FailingNotifier {
    async fn notify(&self, _record: &ContactRecord) -> Result<(), NotificationError> {
        Err(NotificationError::Send("provider answered 500".to_string()))
    }
}

pub(super) fn build_service() -> (
    ContactIntakeService<StaticVerifier, MemoryStore, MemoryNotifier>,
    Arc<StaticVerifier>,
    Arc<MemoryStore>,
    Arc<MemoryNotifier>,
) {
    let verifier = Arc::new(StaticVerifier::accepting());
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ContactIntakeService::new(verifier.clone(), store.clone(), notifier.clone());
    (service, verifier, store, notifier)
}

pub(super) fn contact_router_with_service(
    service: ContactIntakeService<StaticVerifier, MemoryStore, MemoryNotifier>,
) -> axum::Router {
    contact_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

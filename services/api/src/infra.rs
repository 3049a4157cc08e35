use async_trait::async_trait;
use geotecnia::contact::{
    compose_emails, BotVerifier, ContactNotifier, ContactRecord, ContactStore, NotificationError,
    OutboundEmail, StoreError, VerificationError, VerificationOutcome,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Addresses used by the in-memory notifier when composing demo emails.
pub(crate) const DEMO_FROM_EMAIL: &str = "no-reply@geotecniayservicios.es";
pub(crate) const DEMO_TO_EMAIL: &str = "geotecniayservicios@gmail.com";

/// Verifier that accepts any token and reports a fixed score, so the demo can
/// walk both sides of the score threshold without a provider.
pub(crate) struct DemoVerifier {
    score: Option<f32>,
}

impl DemoVerifier {
    pub(crate) fn with_score(score: Option<f32>) -> Self {
        Self { score }
    }
}

#[async_trait]
impl BotVerifier for DemoVerifier {
    async fn verify(&self, token: Option<&str>) -> Result<VerificationOutcome, VerificationError> {
        match token {
            Some(token) if !token.trim().is_empty() => {
                Ok(VerificationOutcome::from_provider(true, self.score))
            }
            _ => Err(VerificationError::MissingToken),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct RecordingStore {
    rows: Arc<Mutex<Vec<ContactRecord>>>,
}

impl RecordingStore {
    pub(crate) fn rows(&self) -> Vec<ContactRecord> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl ContactStore for RecordingStore {
    async fn insert(&self, record: &ContactRecord) -> Result<(), StoreError> {
        let mut guard = self.rows.lock().expect("store mutex poisoned");
        guard.push(record.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct RecordingNotifier {
    emails: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl RecordingNotifier {
    pub(crate) fn emails(&self) -> Vec<OutboundEmail> {
        self.emails.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, record: &ContactRecord) -> Result<(), NotificationError> {
        let pair = compose_emails(record, DEMO_FROM_EMAIL, DEMO_TO_EMAIL);
        let mut guard = self.emails.lock().expect("notifier mutex poisoned");
        guard.extend(pair);
        Ok(())
    }
}

pub(crate) fn parse_score(raw: &str) -> Result<f32, String> {
    let score: f32 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a score ({err})"))?;
    if !(0.0..=1.0).contains(&score) {
        return Err(format!("score {score} is outside 0.0..=1.0"));
    }
    Ok(score)
}

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::ContactConfig;

use super::domain::{ContactRecord, ContactSubmission};
use super::notifier::{ContactNotifier, NotificationError, ResendNotifier};
use super::store::{ContactStore, StoreError, SupabaseStore};
use super::validator::{validate, ValidationError};
use super::verification::{BotVerifier, RecaptchaVerifier, VerificationError};

/// Timeout applied to every outbound provider call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal outcome classes for one submission. `Display` is the user-facing
/// message; the router maps variants to statuses.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The human check reached a verdict and it was "no", or the submission
    /// carried no token to check.
    #[error("Verificación anti-spam fallida")]
    Rejected { score: Option<f32> },
    /// The human check could not run at all (missing secret or unreachable
    /// provider).
    #[error(transparent)]
    Verification(VerificationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

/// Two-phase outcome of an accepted submission. `persisted` without
/// `notified` never reaches a caller as success; it is logged at WARN so
/// operators can reconcile the stored row with the missing emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeReceipt {
    pub persisted: bool,
    pub notified: bool,
}

/// Runs the whole pipeline for one submission: honeypot, validate, verify,
/// persist, notify. Strictly sequential, first failure is terminal, nothing
/// is retried or rolled back.
pub struct ContactIntakeService<V, S, N> {
    verifier: Arc<V>,
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<V, S, N> ContactIntakeService<V, S, N>
where
    V: BotVerifier,
    S: ContactStore,
    N: ContactNotifier,
{
    pub fn new(verifier: Arc<V>, store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            verifier,
            store,
            notifier,
        }
    }

    pub async fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<IntakeReceipt, IntakeError> {
        // Bots fill every field; a filled honeypot is dropped with a
        // success-shaped reply so the sender learns nothing.
        if submission.honeypot_tripped() {
            debug!("honeypot filled, dropping submission");
            return Ok(IntakeReceipt {
                persisted: false,
                notified: false,
            });
        }

        let request = validate(&submission)?;

        let outcome = match self.verifier.verify(submission.token.as_deref()).await {
            Ok(outcome) => outcome,
            Err(VerificationError::MissingToken) => {
                return Err(IntakeError::Rejected { score: None });
            }
            Err(err @ VerificationError::MissingSecret) => {
                error!("RECAPTCHA_SECRET is not configured, refusing submission");
                return Err(IntakeError::Verification(err));
            }
            Err(VerificationError::Unreachable(detail)) => {
                warn!(detail = %detail, "verification provider unreachable");
                return Err(IntakeError::Verification(VerificationError::Unreachable(
                    detail,
                )));
            }
        };
        if !outcome.accepted {
            debug!(score = ?outcome.score, "verification rejected submission");
            return Err(IntakeError::Rejected {
                score: outcome.score,
            });
        }

        let record = ContactRecord::new(request, Utc::now());
        self.store.insert(&record).await?;

        if let Err(err) = self.notifier.notify(&record).await {
            let detail = match &err {
                NotificationError::Send(detail) => detail.as_str(),
                NotificationError::Unconfigured => "RESEND_API_KEY missing",
            };
            warn!(
                persisted = true,
                notified = false,
                detail,
                "contact request stored but notifications failed"
            );
            return Err(IntakeError::Notification(err));
        }

        let receipt = IntakeReceipt {
            persisted: true,
            notified: true,
        };
        info!(
            persisted = receipt.persisted,
            notified = receipt.notified,
            "contact request accepted"
        );
        Ok(receipt)
    }
}

impl ContactIntakeService<RecaptchaVerifier, SupabaseStore, ResendNotifier> {
    /// Wires the live provider clients from configuration, sharing one HTTP
    /// client across the three.
    pub fn from_config(config: &ContactConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self::new(
            Arc::new(RecaptchaVerifier::new(
                config.recaptcha_secret.clone(),
                http.clone(),
            )),
            Arc::new(SupabaseStore::new(
                config.supabase_url.clone(),
                config.supabase_service_role.clone(),
                http.clone(),
            )),
            Arc::new(ResendNotifier::new(
                config.resend_api_key.clone(),
                config.to_email.clone(),
                config.from_email.clone(),
                http,
            )),
        ))
    }
}

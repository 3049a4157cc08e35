use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw contact form body as posted by the site.
///
/// The page historically posted the Spanish field names, so each aliased field
/// accepts either spelling. Required strings default to empty so the validator
/// owns the missing-field message instead of the deserializer. `website` is
/// the hidden honeypot input; humans never fill it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default, alias = "nombre")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "empresa")]
    pub company: Option<String>,
    #[serde(default, alias = "mensaje")]
    pub message: String,
    #[serde(default, alias = "recaptchaToken")]
    pub token: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl ContactSubmission {
    /// True when the hidden honeypot field carries any non-blank value.
    pub fn honeypot_tripped(&self) -> bool {
        self.website
            .as_deref()
            .map_or(false, |value| !value.trim().is_empty())
    }
}

/// Fully validated, normalized form content. Either every field passed its
/// constraint or this value was never constructed; it is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
}

/// A validated request stamped with the server-side insertion timestamp.
///
/// The orchestrator stamps `created_at` when it hands the request to the
/// store, which keeps validation pure; the record is what persistence inserts
/// and what the notifier reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub request: ContactRequest,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    pub fn new(request: ContactRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            request,
            created_at,
        }
    }
}

/// Score a submission must reach (when the provider reports one) to count as
/// human.
pub const MIN_HUMAN_SCORE: f32 = 0.5;

/// Verdict derived from the bot-verification provider's response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationOutcome {
    pub accepted: bool,
    pub score: Option<f32>,
}

impl VerificationOutcome {
    /// Accepted iff the provider reported success and the score, when present,
    /// reaches [`MIN_HUMAN_SCORE`].
    pub fn from_provider(success: bool, score: Option<f32>) -> Self {
        let accepted = success && score.map_or(true, |value| value >= MIN_HUMAN_SCORE);
        Self { accepted, score }
    }
}

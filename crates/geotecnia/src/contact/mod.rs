//! Contact/quote request intake for the site's form.
//!
//! A single pipeline handles every submission: honeypot check, validation,
//! human verification, persistence, notification emails. Each external
//! concern sits behind a trait so the whole pipeline can be driven end to
//! end with in-memory doubles.

pub mod domain;
pub mod notifier;
pub mod router;
pub mod service;
pub mod store;
pub mod validator;
pub mod verification;

#[cfg(test)]
mod tests;

pub use domain::{
    ContactRecord, ContactRequest, ContactSubmission, MIN_HUMAN_SCORE, VerificationOutcome,
};
pub use notifier::{
    compose_emails, ContactNotifier, NotificationError, OutboundEmail, RESEND_URL, ResendNotifier,
};
pub use router::contact_router;
pub use service::{ContactIntakeService, IntakeError, IntakeReceipt};
pub use store::{ContactStore, StoreError, SupabaseStore};
pub use validator::{validate, ValidationError};
pub use verification::{BotVerifier, RecaptchaVerifier, SITEVERIFY_URL, VerificationError};

use async_trait::async_trait;
use serde::Deserialize;

use super::domain::VerificationOutcome;

/// Google's siteverify endpoint, the only upstream this module talks to.
pub const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Ways the human check can fail before a verdict exists. `Display` carries
/// the user-facing message for the variants that reach the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// The deployment has no reCAPTCHA secret, so no token can be checked.
    #[error("Falta RECAPTCHA_SECRET")]
    MissingSecret,
    /// The submission carried no token.
    #[error("Verificación anti-spam fallida")]
    MissingToken,
    /// The provider could not be reached or answered with something
    /// undecodable. Carries the transport detail for the logs.
    #[error("No se pudo verificar la solicitud")]
    Unreachable(String),
}

/// Decides whether a submission came from a human.
#[async_trait]
pub trait BotVerifier: Send + Sync {
    async fn verify(&self, token: Option<&str>)
        -> Result<VerificationOutcome, VerificationError>;
}

/// The slice of the siteverify body the verdict needs; `error-codes`,
/// `hostname` and friends are ignored.
#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
    score: Option<f32>,
}

/// Live verifier posting tokens to the siteverify API.
pub struct RecaptchaVerifier {
    secret: Option<String>,
    http: reqwest::Client,
}

impl RecaptchaVerifier {
    pub fn new(secret: Option<String>, http: reqwest::Client) -> Self {
        Self { secret, http }
    }
}

#[async_trait]
impl BotVerifier for RecaptchaVerifier {
    async fn verify(
        &self,
        token: Option<&str>,
    ) -> Result<VerificationOutcome, VerificationError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or(VerificationError::MissingSecret)?;
        let token = token
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(VerificationError::MissingToken)?;

        let params = [("secret", secret), ("response", token)];
        let response = self
            .http
            .post(SITEVERIFY_URL)
            .form(&params)
            .send()
            .await
            .map_err(|err| VerificationError::Unreachable(err.to_string()))?;
        let body: SiteverifyResponse = response
            .json()
            .await
            .map_err(|err| VerificationError::Unreachable(err.to_string()))?;

        Ok(VerificationOutcome::from_provider(body.success, body.score))
    }
}

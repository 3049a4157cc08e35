use std::sync::OnceLock;

use regex::Regex;

use super::domain::{ContactRequest, ContactSubmission};

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 100;
const MAX_EMAIL_CHARS: usize = 254;
const MIN_COMPANY_CHARS: usize = 2;
const MAX_COMPANY_CHARS: usize = 100;
const MIN_MESSAGE_CHARS: usize = 10;
const MAX_MESSAGE_CHARS: usize = 1000;

/// Letters (including the accented set used in Spanish), spaces, apostrophes
/// and hyphens.
const NAME_PATTERN: &str = "^[A-Za-zÁÉÍÓÚáéíóúÑñÜü' -]+$";
/// local@domain.tld with the hyphen placed so the class stays a literal.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern compiles"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// First violated constraint for a submission, with the user-facing message
/// the site has always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Faltan campos obligatorios")]
    MissingFields,
    #[error("El nombre debe tener al menos 2 caracteres")]
    NameTooShort,
    #[error("El nombre es demasiado largo")]
    NameTooLong,
    #[error("El nombre contiene caracteres inválidos")]
    NameInvalidChars,
    #[error("Email inválido")]
    EmailInvalid,
    #[error("Email demasiado largo")]
    EmailTooLong,
    #[error("La empresa debe tener al menos 2 caracteres")]
    CompanyTooShort,
    #[error("La empresa es demasiado larga")]
    CompanyTooLong,
    #[error("El mensaje debe tener al menos 10 caracteres")]
    MessageTooShort,
    #[error("El mensaje es demasiado largo")]
    MessageTooLong,
}

/// Validate and normalize a raw submission into a [`ContactRequest`].
///
/// Fields are trimmed before any check and the email is lower-cased. Checks
/// run in the fixed order name, email, company, message and stop at the first
/// violation; a missing required field is reported before any per-field rule.
/// Pure: no I/O, no clock, no environment.
pub fn validate(submission: &ContactSubmission) -> Result<ContactRequest, ValidationError> {
    let name = submission.name.trim();
    let email = submission.email.trim().to_lowercase();
    let message = submission.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let name_chars = name.chars().count();
    if name_chars < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }
    if name_chars > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if !name_regex().is_match(name) {
        return Err(ValidationError::NameInvalidChars);
    }

    if !email_regex().is_match(&email) {
        return Err(ValidationError::EmailInvalid);
    }
    if email.chars().count() > MAX_EMAIL_CHARS {
        return Err(ValidationError::EmailTooLong);
    }

    // Blank company collapses to "not provided" rather than an empty string.
    let company = submission
        .company
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(company) = company {
        let company_chars = company.chars().count();
        if company_chars < MIN_COMPANY_CHARS {
            return Err(ValidationError::CompanyTooShort);
        }
        if company_chars > MAX_COMPANY_CHARS {
            return Err(ValidationError::CompanyTooLong);
        }
    }

    let message_chars = message.chars().count();
    if message_chars < MIN_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooShort);
    }
    if message_chars > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong);
    }

    Ok(ContactRequest {
        name: name.to_string(),
        email,
        company: company.map(str::to_string),
        message: message.to_string(),
    })
}

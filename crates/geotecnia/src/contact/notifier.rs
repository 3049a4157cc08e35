use async_trait::async_trait;
use serde::Serialize;

use super::domain::ContactRecord;

/// Resend's send endpoint.
pub const RESEND_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// No Resend API key in the deployment; the record is already stored.
    #[error("Falta RESEND_API_KEY, no se envió email")]
    Unconfigured,
    /// A send was attempted and failed; carries the provider detail.
    #[error("No se pudieron enviar los correos")]
    Send(String),
}

/// Dispatches the two notification emails for a stored record.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, record: &ContactRecord) -> Result<(), NotificationError>;
}

/// One outgoing message in the shape Resend's API takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Both messages for one record, operator notification first. Pure, so the
/// wording can be checked without a provider.
pub fn compose_emails(
    record: &ContactRecord,
    from_email: &str,
    to_email: &str,
) -> [OutboundEmail; 2] {
    [
        operator_email(record, from_email, to_email),
        acknowledgment_email(record, from_email),
    ]
}

fn operator_email(record: &ContactRecord, from_email: &str, to_email: &str) -> OutboundEmail {
    let request = &record.request;
    let company_line = request
        .company
        .as_deref()
        .map(|company| format!("\nEmpresa: {company}"))
        .unwrap_or_default();
    let text = format!(
        "Nueva solicitud de presupuesto:\n\nNombre: {}\nEmail: {}{}\n\nMensaje:\n{}\n\n—\nEste correo fue enviado automáticamente por la web.",
        request.name, request.email, company_line, request.message
    );
    OutboundEmail {
        from: from_email.to_string(),
        to: to_email.to_string(),
        subject: format!("Nueva solicitud de presupuesto de {}", request.name),
        text,
        // Replying from the inbox goes straight to the requester.
        reply_to: Some(request.email.clone()),
    }
}

fn acknowledgment_email(record: &ContactRecord, from_email: &str) -> OutboundEmail {
    let request = &record.request;
    OutboundEmail {
        from: from_email.to_string(),
        to: request.email.clone(),
        subject: "Hemos recibido tu solicitud".to_string(),
        text: format!(
            "Hola {},\n\nGracias por contactarnos. Hemos recibido tu solicitud y te responderemos en menos de 24h.\n\nUn saludo,\nGeotecnia y Servicios",
            request.name
        ),
        reply_to: None,
    }
}

/// Live notifier posting through the Resend API. The second send only runs
/// when the first succeeded.
pub struct ResendNotifier {
    api_key: Option<String>,
    to_email: String,
    from_email: String,
    http: reqwest::Client,
}

impl ResendNotifier {
    pub fn new(
        api_key: Option<String>,
        to_email: String,
        from_email: String,
        http: reqwest::Client,
    ) -> Self {
        Self {
            api_key,
            to_email,
            from_email,
            http,
        }
    }

    async fn send(&self, key: &str, email: &OutboundEmail) -> Result<(), NotificationError> {
        let response = self
            .http
            .post(RESEND_URL)
            .bearer_auth(key)
            .json(email)
            .send()
            .await
            .map_err(|err| NotificationError::Send(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(NotificationError::Send(detail));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactNotifier for ResendNotifier {
    async fn notify(&self, record: &ContactRecord) -> Result<(), NotificationError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(NotificationError::Unconfigured)?;
        let [operator, acknowledgment] = compose_emails(record, &self.from_email, &self.to_email);
        self.send(key, &operator).await?;
        self.send(key, &acknowledgment).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::domain::ContactRequest;
    use chrono::{TimeZone, Utc};

    const FROM: &str = "no-reply@geotecniayservicios.es";
    const TO: &str = "geotecniayservicios@gmail.com";

    fn record(company: Option<&str>) -> ContactRecord {
        ContactRecord {
            request: ContactRequest {
                name: "Juan Perez".into(),
                email: "juan@example.com".into(),
                company: company.map(str::to_string),
                message: "Hola, necesito un estudio del terreno.".into(),
            },
            created_at: Utc.with_ymd_and_hms(2026, 8, 24, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn operator_notification_goes_first_and_replies_reach_the_requester() {
        let [operator, acknowledgment] = compose_emails(&record(Some("ACME")), FROM, TO);

        assert_eq!(operator.to, TO);
        assert_eq!(operator.subject, "Nueva solicitud de presupuesto de Juan Perez");
        assert_eq!(operator.reply_to.as_deref(), Some("juan@example.com"));
        assert!(operator.text.contains("Nombre: Juan Perez"));
        assert!(operator.text.contains("Empresa: ACME"));
        assert!(operator.text.contains("Mensaje:\nHola, necesito un estudio del terreno."));

        assert_eq!(acknowledgment.to, "juan@example.com");
        assert_eq!(acknowledgment.subject, "Hemos recibido tu solicitud");
        assert!(acknowledgment.text.starts_with("Hola Juan Perez,"));
        assert!(acknowledgment.text.contains("en menos de 24h"));
        assert_eq!(acknowledgment.reply_to, None);
    }

    #[test]
    fn company_line_is_omitted_when_absent() {
        let [operator, _] = compose_emails(&record(None), FROM, TO);
        assert!(!operator.text.contains("Empresa:"));
    }

    #[test]
    fn reply_to_is_dropped_from_the_wire_when_unset() {
        let [operator, acknowledgment] = compose_emails(&record(None), FROM, TO);
        let operator = serde_json::to_value(&operator).unwrap();
        assert_eq!(operator["reply_to"], "juan@example.com");
        let acknowledgment = serde_json::to_value(&acknowledgment).unwrap();
        assert!(acknowledgment.get("reply_to").is_none());
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_send() {
        let notifier = ResendNotifier::new(None, TO.into(), FROM.into(), reqwest::Client::new());
        let err = notifier.notify(&record(None)).await.unwrap_err();
        assert_eq!(err, NotificationError::Unconfigured);
    }
}

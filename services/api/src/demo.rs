use crate::infra::{parse_score, DemoVerifier, RecordingNotifier, RecordingStore};
use chrono::SecondsFormat;
use clap::Args;
use geotecnia::contact::{validate, ContactIntakeService, ContactRecord, ContactSubmission};
use geotecnia::error::AppError;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Fill the hidden honeypot field to walk the silent-drop path.
    #[arg(long)]
    pub(crate) honeypot: bool,
    /// Verification score reported by the in-memory verifier (0.0 to 1.0).
    #[arg(long, value_parser = parse_score)]
    pub(crate) score: Option<f32>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// JSON payload to check against the intake rules.
    #[arg(long)]
    pub(crate) file: PathBuf,
}

/// Stored row as it would land in the `contact_requests` table.
#[derive(Serialize)]
struct StoredRowView<'a> {
    nombre: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    empresa: Option<&'a str>,
    mensaje: &'a str,
    created_at: String,
}

impl<'a> StoredRowView<'a> {
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

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { honeypot, score } = args;
    let score = score.unwrap_or(0.9);

    let store = Arc::new(RecordingStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = ContactIntakeService::new(
        Arc::new(DemoVerifier::with_score(Some(score))),
        store.clone(),
        notifier.clone(),
    );

    let mut submission = ContactSubmission {
        name: "María Jiménez".to_string(),
        email: "Maria.Jimenez@Example.com".to_string(),
        company: Some("Construcciones Jiménez".to_string()),
        message: "Necesitamos un estudio geotécnico para una nave industrial en Sevilla."
            .to_string(),
        token: Some("demo-token".to_string()),
        website: None,
    };
    if honeypot {
        submission.website = Some("https://spam.example".to_string());
    }

    println!("Contact intake demo (in-memory providers)");
    println!(
        "- Submitting as {} <{}> with score {:.2}{}",
        submission.name,
        submission.email,
        score,
        if honeypot { ", honeypot filled" } else { "" }
    );

    let receipt = match service.submit(submission).await {
        Ok(receipt) => receipt,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "  Receipt: persisted={} notified={}",
        receipt.persisted, receipt.notified
    );

    let rows = store.rows();
    if rows.is_empty() {
        println!("  Stored rows: none");
    } else {
        println!("  Stored rows:");
        for record in &rows {
            match serde_json::to_string_pretty(&StoredRowView::from_record(record)) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("    (row unavailable: {err})"),
            }
        }
    }

    let emails = notifier.emails();
    if emails.is_empty() {
        println!("  Outbound emails: none");
    } else {
        println!("  Outbound emails:");
        for email in &emails {
            let reply_note = match &email.reply_to {
                Some(address) => format!(" | reply-to {address}"),
                None => String::new(),
            };
            println!("    - to {} | {}{}", email.to, email.subject, reply_note);
        }
    }

    Ok(())
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let submission: ContactSubmission = match serde_json::from_str(&raw) {
        Ok(submission) => submission,
        Err(err) => {
            println!("Payload is not valid JSON: {err}");
            return Ok(());
        }
    };

    match validate(&submission) {
        Ok(request) => {
            println!("Payload passes the intake rules");
            println!("- Name: {}", request.name);
            println!("- Email: {}", request.email);
            match &request.company {
                Some(company) => println!("- Company: {company}"),
                None => println!("- Company: (not provided)"),
            }
            println!(
                "- Message: {} characters",
                request.message.chars().count()
            );
        }
        Err(err) => println!("Payload rejected: {err}"),
    }

    Ok(())
}

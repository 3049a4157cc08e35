//! Contact and quote request intake for the Geotecnia y Servicios site.
//!
//! The crate owns the single piece of server-side logic behind the marketing
//! page: accepting a contact form submission, validating it, checking the
//! reCAPTCHA token, storing the request in Supabase, and sending the two
//! notification emails through Resend. Each external provider sits behind a
//! capability trait so the pipeline can be exercised with in-memory doubles.

pub mod config;
pub mod contact;
pub mod error;
pub mod telemetry;

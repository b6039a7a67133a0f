// --- File: crates/bookify_sendgrid/src/lib.rs ---
// Declare modules within this crate
pub mod service;
#[cfg(test)]
mod service_test;

pub use service::SendGridMailer;

//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::errors::DomainError;

/// Print a failed command and exit non-zero.
///
/// Catalog errors are reported as `<CODE>: <message>`; anything else is
/// reported as an internal error with its context chain.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let (code, message) = match err.downcast_ref::<DomainError>() {
        Some(domain) => (domain.code(), domain.to_string()),
        None => ("INTERNAL_SERVER_ERROR", format!("{err:#}")),
    };

    if json_mode {
        let body = serde_json::json!({ "error": { "code": code, "message": message } });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{code}: {message}");
    }
    std::process::exit(1);
}

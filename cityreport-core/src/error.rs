use thiserror::Error;

/// Errors surfaced to the caller of the core library.
///
/// Per-target failures (server errors, client errors, transport failures) never
/// show up here: they are settled inside the orchestrator and reported as text.
#[derive(Debug, Error)]
pub enum CityReportError {
    /// No city words were given on the command line.
    #[error("Please enter a city")]
    InvalidInput,

    /// A target URL could not be assembled from its base URL.
    #[error("Invalid base URL '{base}' for {target}: {reason}")]
    InvalidBaseUrl { target: &'static str, base: String, reason: String },
}

/// A response body that does not have the shape a formatter expects.
#[derive(Debug, Error)]
#[error("malformed {what} payload: {reason}")]
pub struct MalformedPayload {
    pub what: &'static str,
    pub reason: String,
}

impl MalformedPayload {
    pub fn new(what: &'static str, reason: impl Into<String>) -> Self {
        Self { what, reason: reason.into() }
    }
}

//! Core library for the `cityreport` CLI.
//!
//! This crate defines:
//! - City normalization and per-API endpoint construction
//! - Response classification and the per-target exponential backoff controller
//! - The orchestrator that drives both targets concurrently
//! - Weather and air-quality report formatting
//!
//! It is used by `cityreport-cli`, but can also be reused by other binaries or services.

pub mod backoff;
pub mod city;
pub mod classify;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod target;
pub mod transport;

pub use backoff::{BackoffController, BackoffPolicy, NextStep, Phase, RetryState};
pub use city::CityQuery;
pub use classify::{ClassifiedResponse, ResponseClass, classify};
pub use config::Settings;
pub use console::{Console, StdoutConsole};
#[cfg(any(test, feature = "test-util"))]
pub use console::MemoryConsole;
pub use error::CityReportError;
pub use orchestrator::{Orchestrator, Settled, TargetOutcome};
pub use report::Report;
pub use target::{ApiTarget, TargetId};
pub use transport::{HttpReply, ReqwestTransport, Transport, TransportError};

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Fetch and print weather and air quality for the city named by `words`.
///
/// Fails only for unusable input; every per-target problem is reported on
/// `console` and reflected in the returned outcomes.
pub async fn report_city<S: AsRef<str>>(
    words: &[S],
    settings: &Settings,
    transport: &dyn Transport,
    console: &dyn Console,
    cancel: CancellationToken,
) -> Result<Vec<TargetOutcome>, CityReportError> {
    let city = CityQuery::from_words(words)?;
    let targets = target::targets_from_settings(settings, &city)?;
    info!(%city, "fetching weather and air quality");

    let outcomes = Orchestrator::new(transport, console, settings.backoff)
        .with_cancellation(cancel)
        .run(&targets, &city)
        .await;

    Ok(outcomes)
}

use anyhow::Context;
use clap::Parser;
use cityreport_core::{
    CityQuery, CityReportError, Console, ReqwestTransport, Settings, StdoutConsole, Transport,
    report_city,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Top-level CLI struct.
///
/// API keys are read from `OPENWEATHER_API_KEY` and `WAQI_TOKEN`.
#[derive(Debug, Parser)]
#[command(name = "cityreport", version, about = "Current weather and air quality for a city")]
pub struct Cli {
    /// City name; several words are joined with single spaces.
    #[arg(value_name = "CITY")]
    pub city: Vec<String>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_on(&StdoutConsole).await
    }

    /// Prompt and return straight away when no city was given; otherwise read
    /// settings, set up HTTP and Ctrl-C handling, and report.
    async fn run_on(self, console: &dyn Console) -> anyhow::Result<()> {
        if let Err(err) = CityQuery::from_words(self.city.as_slice()) {
            console.print(&err.to_string());
            return Ok(());
        }

        let settings = Settings::from_env();
        let transport = ReqwestTransport::new().context("Failed to set up HTTP transport")?;

        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, abandoning pending calls");
                interrupt.cancel();
            }
        });

        self.run_with(&settings, &transport, console, cancel).await
    }

    async fn run_with(
        self,
        settings: &Settings,
        transport: &dyn Transport,
        console: &dyn Console,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        match report_city(self.city.as_slice(), settings, transport, console, cancel).await {
            Ok(outcomes) => {
                debug!(?outcomes, "all targets settled");
                Ok(())
            }
            Err(err @ CityReportError::InvalidInput) => {
                console.print(&err.to_string());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

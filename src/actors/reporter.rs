//! ReporterActor - Pushes local machine metrics to a hub
//!
//! Runs on the agent side. The actor registers its identity with the hub and
//! then reports a fresh sample on every interval tick.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Sample source → POST / (Rr-Identity + form) → hub registry
//!     ↑
//!     └─── Commands (ReportNow, UpdateInterval, Shutdown)
//! ```
//!
//! Failed reports are logged and the next tick simply tries again; there is
//! no retry or backoff.
//!
//! The hub keeps identities in memory only and silently drops reports for
//! identities it does not know, so a restarted hub never tells the reporter
//! to register again. The reporter therefore registers again before the
//! first report after any failed request, and after every
//! [`REREGISTER_EVERY`] successful reports.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::time::interval;
use tracing::{debug, error, info, instrument, trace, warn};

use super::messages::ReporterCommand;
use crate::monitors::MetricsSource;
use crate::util::{ADD_IDENTITY_PATH, IDENTITY_HEADER, REPORT_PATH};

/// Successful reports after which the identity is registered again
pub const REREGISTER_EVERY: u32 = 10;

/// Where and how often a reporter reports
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Base URL of the hub (e.g., "http://127.0.0.1:34567")
    pub hub_url: String,

    /// Identity to register and report under
    pub identity: String,

    /// Reporting interval in seconds
    pub interval: u64,
}

impl ReporterConfig {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.hub_url.trim_end_matches('/'))
    }
}

/// Actor that reports one machine's metrics to a hub
pub struct ReporterActor {
    config: ReporterConfig,

    /// HTTP client (reused across requests)
    client: reqwest::Client,

    source: Box<dyn MetricsSource>,

    command_rx: mpsc::Receiver<ReporterCommand>,

    /// Reports sent since the hub last acknowledged our identity; `None`
    /// until the next registration
    reports_since_register: Option<u32>,

    interval_duration: Duration,
}

impl ReporterActor {
    /// Create a new reporter actor
    pub fn new(
        config: ReporterConfig,
        source: Box<dyn MetricsSource>,
        command_rx: mpsc::Receiver<ReporterCommand>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;

        let interval_duration = Duration::from_secs(config.interval.max(1));

        Ok(Self {
            config,
            client,
            source,
            command_rx,
            reports_since_register: None,
            interval_duration,
        })
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received or the command channel is
    /// closed.
    #[instrument(skip(self), fields(identity = %self.config.identity))]
    pub async fn run(mut self) {
        debug!("starting reporter actor");

        let mut ticker = interval(self.interval_duration);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.report().await {
                        error!("failed to report metrics: {:#}", e);
                    }
                }

                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        warn!("command channel closed, shutting down");
                        break;
                    };

                    match cmd {
                        ReporterCommand::ReportNow { respond_to } => {
                            debug!("received ReportNow command");
                            let result = self.report().await;
                            let _ = respond_to.send(result);
                        }

                        ReporterCommand::UpdateInterval { interval_secs } => {
                            debug!("updating interval to {interval_secs}s");
                            self.interval_duration = Duration::from_secs(interval_secs.max(1));
                            ticker = interval(self.interval_duration);
                        }

                        ReporterCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }
            }
        }

        debug!("reporter actor stopped");
    }

    /// Register if due, then send one sample to the hub
    async fn report(&mut self) -> Result<()> {
        let result = self.try_report().await;

        if result.is_err() {
            // The hub may have lost our identity
            self.reports_since_register = None;
        }

        result
    }

    async fn try_report(&mut self) -> Result<()> {
        let sent = match self.reports_since_register {
            Some(sent) if sent < REREGISTER_EVERY => sent,
            _ => {
                self.register().await?;
                0
            }
        };

        let info = self.source.sample();
        let url = self.config.endpoint(REPORT_PATH);

        trace!("reporting metrics to {url}");

        let response = self
            .client
            .post(&url)
            .header(IDENTITY_HEADER, &self.config.identity)
            .form(&info)
            .send()
            .await
            .context("failed to send HTTP request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        trace!("metrics reported");
        self.reports_since_register = Some(sent + 1);

        Ok(())
    }

    async fn register(&self) -> Result<()> {
        let url = self.config.endpoint(ADD_IDENTITY_PATH);

        let response = self
            .client
            .post(&url)
            .form(&[("name", self.config.identity.as_str())])
            .send()
            .await
            .context("failed to send registration request")?;

        if !response.status().is_success() {
            anyhow::bail!("registration failed: HTTP {}", response.status());
        }

        info!("registered identity with hub at {}", self.config.hub_url);

        Ok(())
    }
}

/// Handle for controlling a ReporterActor
#[derive(Clone)]
pub struct ReporterHandle {
    sender: mpsc::Sender<ReporterCommand>,
}

impl ReporterHandle {
    /// Spawn a new reporter actor
    pub fn spawn(config: ReporterConfig, source: Box<dyn MetricsSource>) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = ReporterActor::new(config, source, cmd_rx)?;

        tokio::spawn(actor.run());

        Ok(Self { sender: cmd_tx })
    }

    /// Report immediately, bypassing the interval timer
    pub async fn report_now(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ReporterCommand::ReportNow { respond_to: tx })
            .await
            .context("failed to send ReportNow command")?;

        rx.await.context("failed to receive response")??;
        Ok(())
    }

    /// Update the reporting interval
    pub async fn update_interval(&self, interval_secs: u64) -> Result<()> {
        self.sender
            .send(ReporterCommand::UpdateInterval { interval_secs })
            .await
            .context("failed to send UpdateInterval command")?;
        Ok(())
    }

    /// Gracefully shut down the reporter
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(ReporterCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}

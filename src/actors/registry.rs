//! RegistryActor - Owns the identity → metrics map
//!
//! The map lives inside the actor and is never shared. Every read and write
//! arrives as a [`RegistryCommand`] on a single mailbox and is serviced to
//! completion before the next one is taken, so the state after any set of
//! completed calls is exactly the replay of those calls in service order.
//!
//! ## Message Flow
//!
//! ```text
//! RegistryHandle ──► mpsc mailbox ──► RegistryActor ──► oneshot reply
//! ```
//!
//! ## Lifecycle
//!
//! Running until a `Shutdown` command arrives or every handle is dropped.
//! Once stopped, queued commands are dropped with their reply senders, so
//! waiting callers get an error from the handle instead of a reply.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, trace, warn};

use super::messages::{RegistryCommand, RegistryStats};
use crate::{ResourceInfo, Snapshot};

/// Capacity of the registry mailbox
const MAILBOX_SIZE: usize = 256;

/// Actor owning the registry map
pub struct RegistryActor {
    /// Identity → latest reported metrics
    registry: HashMap<String, ResourceInfo>,

    /// Command receiver
    command_rx: mpsc::Receiver<RegistryCommand>,

    updates_applied: u64,
    updates_rejected: u64,
    last_update: Option<DateTime<Utc>>,
}

impl RegistryActor {
    /// Create a new registry actor with an empty map
    pub fn new(command_rx: mpsc::Receiver<RegistryCommand>) -> Self {
        Self {
            registry: HashMap::new(),
            command_rx,
            updates_applied: 0,
            updates_rejected: 0,
            last_update: None,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received or the command channel is
    /// closed.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting registry actor");

        loop {
            match self.command_rx.recv().await {
                Some(RegistryCommand::AddIdentity {
                    identity,
                    respond_to,
                }) => {
                    self.add_identity(identity);
                    let _ = respond_to.send(());
                }

                Some(RegistryCommand::UpdateInfo {
                    identity,
                    info,
                    respond_to,
                }) => {
                    let updated = self.update_info(&identity, info);
                    let _ = respond_to.send(updated);
                }

                Some(RegistryCommand::Snapshot { respond_to }) => {
                    trace!("taking snapshot of {} identities", self.registry.len());
                    let _ = respond_to.send(self.registry.clone());
                }

                Some(RegistryCommand::GetStats { respond_to }) => {
                    let _ = respond_to.send(self.stats());
                }

                Some(RegistryCommand::Shutdown) => {
                    debug!("received shutdown command");
                    break;
                }

                // Every handle dropped
                None => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!(identities = self.registry.len(), "registry actor stopped");
    }

    fn add_identity(&mut self, identity: String) {
        match self.registry.insert(identity.clone(), ResourceInfo::default()) {
            Some(_) => debug!("reset metrics of identity {identity}"),
            None => debug!("added identity {identity}"),
        }
    }

    fn update_info(&mut self, identity: &str, info: ResourceInfo) -> bool {
        let Some(entry) = self.registry.get_mut(identity) else {
            self.updates_rejected += 1;
            warn!("rejected update for unknown identity {identity}");
            return false;
        };

        *entry = info;
        self.updates_applied += 1;
        self.last_update = Some(Utc::now());
        trace!("updated metrics of identity {identity}");

        true
    }

    fn stats(&self) -> RegistryStats {
        RegistryStats {
            identities: self.registry.len(),
            updates_applied: self.updates_applied,
            updates_rejected: self.updates_rejected,
            last_update: self.last_update,
        }
    }
}

/// Handle for talking to the RegistryActor
///
/// This is the only way to reach the registry. It can be cloned and shared
/// across tasks; each operation waits for the actor to service it.
///
/// There is no timeout: a stalled actor stalls its callers.
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    /// Spawn a new registry actor
    pub fn spawn() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(MAILBOX_SIZE);

        let actor = RegistryActor::new(cmd_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Add an identity, resetting its metrics if it already exists
    pub async fn add_identity(&self, identity: impl Into<String>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::AddIdentity {
                identity: identity.into(),
                respond_to: tx,
            })
            .await
            .context("failed to send AddIdentity command")?;

        rx.await.context("failed to receive response")
    }

    /// Overwrite the metrics of a known identity
    ///
    /// Returns `Ok(false)` if the identity was never added; the registry is
    /// left unchanged in that case.
    pub async fn update_info(
        &self,
        identity: impl Into<String>,
        info: ResourceInfo,
    ) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::UpdateInfo {
                identity: identity.into(),
                info,
                respond_to: tx,
            })
            .await
            .context("failed to send UpdateInfo command")?;

        rx.await.context("failed to receive response")
    }

    /// Get an independent copy of the whole registry
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::Snapshot { respond_to: tx })
            .await
            .context("failed to send Snapshot command")?;

        rx.await.context("failed to receive response")
    }

    /// Get registry statistics
    pub async fn get_stats(&self) -> Result<RegistryStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::GetStats { respond_to: tx })
            .await
            .context("failed to send GetStats command")?;

        rx.await.context("failed to receive response")
    }

    /// Stop the actor. Irreversible.
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(RegistryCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}

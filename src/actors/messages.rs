//! Message types for actor communication
//!
//! ## Design Principles
//!
//! 1. **Commands**: Request/response messages sent to a specific actor via mpsc
//! 2. **One reply per request**: Every query carries its own oneshot sender,
//!    which the actor fulfils exactly once

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::{ResourceInfo, Snapshot};

/// Commands that can be sent to the RegistryActor
#[derive(Debug)]
pub enum RegistryCommand {
    /// Insert an identity, or reset an existing one to empty metrics
    AddIdentity {
        identity: String,
        respond_to: oneshot::Sender<()>,
    },

    /// Overwrite the metrics of a known identity
    ///
    /// Replies `false` when the identity was never added.
    UpdateInfo {
        identity: String,
        info: ResourceInfo,
        respond_to: oneshot::Sender<bool>,
    },

    /// Copy out the whole registry
    Snapshot {
        respond_to: oneshot::Sender<Snapshot>,
    },

    /// Get registry statistics
    GetStats {
        respond_to: oneshot::Sender<RegistryStats>,
    },

    /// Stop servicing requests
    ///
    /// Commands still queued behind this one are dropped.
    Shutdown,
}

/// Registry statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryStats {
    /// Number of known identities
    pub identities: usize,

    /// Updates that overwrote a record
    pub updates_applied: u64,

    /// Updates rejected because the identity was never added
    pub updates_rejected: u64,

    /// When the last update was applied
    pub last_update: Option<DateTime<Utc>>,
}

/// Commands that can be sent to a ReporterActor
#[derive(Debug)]
pub enum ReporterCommand {
    /// Report immediately (bypassing the interval timer)
    ReportNow {
        respond_to: oneshot::Sender<anyhow::Result<()>>,
    },

    /// Update the reporting interval
    UpdateInterval { interval_secs: u64 },

    /// Gracefully shut down the reporter
    Shutdown,
}

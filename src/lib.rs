pub mod actors;
#[cfg(feature = "api")]
pub mod api;
pub mod monitors;
pub mod util;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Resource metrics reported by a single agent.
///
/// All values are kept verbatim as strings; the registry never parses or
/// validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub mem: String,
    pub cpu: String,
    pub cpu_name: String,
    pub host: String,
    pub conn: String,
}

/// Point-in-time copy of every known identity and its latest metrics.
pub type Snapshot = HashMap<String, ResourceInfo>;

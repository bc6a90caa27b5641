//! Actor-based registry system
//!
//! Each actor runs as an independent async task and is reached only through
//! a cloneable handle that sends commands over a Tokio channel.
//!
//! ## Architecture Overview
//!
//! ```text
//!   HTTP handlers (api)            Agent (bin)
//!          │                            │
//!          │ RegistryHandle             │ ReporterHandle
//!          ▼                            ▼
//!   ┌───────────────┐  HTTP     ┌────────────────┐
//!   │ RegistryActor │ ◄──────── │ ReporterActor  │
//!   │ (owns map)    │           │ (samples host) │
//!   └───────────────┘           └────────────────┘
//! ```
//!
//! ## Actor Types
//!
//! - **RegistryActor**: Owns the identity → metrics map, services one command at a time
//! - **ReporterActor**: Samples local machine metrics and pushes them to a hub
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each actor has an mpsc command channel
//! 2. **Request/Response**: oneshot channels for synchronous queries

pub mod messages;
pub mod registry;
pub mod reporter;

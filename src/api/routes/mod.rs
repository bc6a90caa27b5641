pub mod identities;
pub mod report;
pub mod snapshot;

pub mod system;

pub use system::{MetricsSource, SystemSource};

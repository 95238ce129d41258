use crate::domain::{DomainError, LaunchSignals};

/// Port for application version tracking.
pub trait LaunchTracker: Send + Sync {
    /// Signals describing this launch relative to the previous one.
    fn signals(&self) -> LaunchSignals;

    /// Persist the current version so the next launch compares against it.
    fn record(&self) -> Result<(), DomainError>;
}

use crate::domain::{DomainError, Notification};

/// Port for user-facing events.
///
/// The presentation layer decides how these are shown; the resource manager
/// only emits them.
pub trait Notifier: Send + Sync {
    /// Post a passive notification (for example after a GeoIP update).
    fn notify(&self, notification: &Notification);

    /// Report an error the application cannot continue after.
    ///
    /// The host is expected to terminate once the user acknowledges it.
    fn fatal(&self, error: &DomainError);
}

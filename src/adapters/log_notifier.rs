use tracing::{error, info, warn};

use crate::domain::{DomainError, Notification};
use crate::ports::Notifier;

/// Notifier for headless hosts: every event goes to the log, and fatal
/// events are also written to stderr so the user sees them before exit.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    /// Message shown to the user when the config directory is unusable.
    pub fn fatal_message(error: &DomainError) -> String {
        match error {
            DomainError::Provisioning { path, .. } => format!(
                "Failed to create the {} folder. Please check privileges \
                 or create the folder manually and restart.",
                path.display()
            ),
            other => other.to_string(),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        if notification.success {
            info!(title = %notification.title, body = %notification.body, "Notification");
        } else {
            warn!(title = %notification.title, body = %notification.body, "Notification");
        }
    }

    fn fatal(&self, error: &DomainError) {
        error!(error = %error, "Fatal error");
        eprintln!("{}", Self::fatal_message(error));
    }
}

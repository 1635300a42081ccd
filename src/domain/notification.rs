use serde::{Deserialize, Serialize};

/// Permission to raise desktop notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// Not decided yet; asked for on the first notification.
    #[default]
    Default,
    Granted,
    Denied,
}

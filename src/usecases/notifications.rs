//! Deciding where an incoming chat message surfaces, and raising notifications.

use crate::domain::{message::Message, notification::NotificationPermission, user::UserId};

use super::contracts::Notifier;

const NOTIFY_FAILED: &str = "NOTIFY_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    RenderInThread,
    Notify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    /// Notifications are unavailable; the text belongs in the in-app alert line.
    Alert(String),
    Failed,
}

/// Routes a message from someone else. Messages for the open conversation render
/// in-thread unless the terminal is out of focus.
pub fn route_incoming(
    message: &Message,
    local_user: UserId,
    open_peer: Option<UserId>,
    visible: bool,
) -> Route {
    if visible && open_peer == Some(message.conversation_peer(local_user)) {
        Route::RenderInThread
    } else {
        Route::Notify
    }
}

pub fn deliver(notifier: &mut dyn Notifier, message: &Message) -> Outcome {
    let permission = match notifier.permission() {
        NotificationPermission::Default => notifier.request_permission(),
        decided => decided,
    };

    if permission != NotificationPermission::Granted {
        return Outcome::Alert(alert_text(message));
    }

    match notifier.notify(&message.sender_name, &message.body) {
        Ok(()) => Outcome::Delivered,
        Err(error) => {
            tracing::warn!(code = NOTIFY_FAILED, error = %error, "failed to raise notification");
            Outcome::Failed
        }
    }
}

fn alert_text(message: &Message) -> String {
    format!("New message from {}: {}", message.sender_name, message.body)
}

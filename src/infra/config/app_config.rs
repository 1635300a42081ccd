use serde::{Deserialize, Serialize};

use crate::domain::notification::NotificationPermission;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub chat: ChatConfig,
    pub reconnect: ReconnectConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file_name: "rtf.log".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub base_url: String,
    pub ws_path: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8080".to_owned(),
            ws_path: "/ws".to_owned(),
            request_timeout_ms: 10_000,
        }
    }
}

/// The signed-in account. The forum issues the cookie at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub user_id: i64,
    pub username: String,
    pub cookie: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: 0,
            username: "replace-me".to_owned(),
            cookie: String::new(),
        }
    }
}

impl SessionConfig {
    pub fn cookie(&self) -> Option<&str> {
        let cookie = self.cookie.trim();
        (!cookie.is_empty()).then_some(cookie)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    pub typing_idle_ms: u64,
    pub scroll_throttle_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_idle_ms: 5_000,
            scroll_throttle_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconnectConfig {
    pub enabled: bool,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Zero retries forever.
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
            max_attempts: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NotificationConfig {
    pub permission: NotificationPermission,
}

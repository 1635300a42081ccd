use serde::Deserialize;

use crate::{
    domain::notification::NotificationPermission,
    infra::config::{
        AppConfig, ChatConfig, LogConfig, NotificationConfig, ReconnectConfig, ServerConfig,
        SessionConfig,
    },
};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub server: Option<FileServerConfig>,
    pub session: Option<FileSessionConfig>,
    pub chat: Option<FileChatConfig>,
    pub reconnect: Option<FileReconnectConfig>,
    pub notifications: Option<FileNotificationConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(server) = self.server {
            server.merge_into(&mut config.server);
        }

        if let Some(session) = self.session {
            session.merge_into(&mut config.session);
        }

        if let Some(chat) = self.chat {
            chat.merge_into(&mut config.chat);
        }

        if let Some(reconnect) = self.reconnect {
            reconnect.merge_into(&mut config.reconnect);
        }

        if let Some(notifications) = self.notifications {
            notifications.merge_into(&mut config.notifications);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file_name: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file_name) = self.file_name {
            config.file_name = file_name;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileServerConfig {
    pub base_url: Option<String>,
    pub ws_path: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl FileServerConfig {
    fn merge_into(self, config: &mut ServerConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(ws_path) = self.ws_path {
            config.ws_path = ws_path;
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSessionConfig {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub cookie: Option<String>,
}

impl FileSessionConfig {
    fn merge_into(self, config: &mut SessionConfig) {
        if let Some(user_id) = self.user_id {
            config.user_id = user_id;
        }

        if let Some(username) = self.username {
            config.username = username;
        }

        if let Some(cookie) = self.cookie {
            config.cookie = cookie;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub typing_idle_ms: Option<u64>,
    pub scroll_throttle_ms: Option<u64>,
}

impl FileChatConfig {
    fn merge_into(self, config: &mut ChatConfig) {
        if let Some(typing_idle_ms) = self.typing_idle_ms {
            config.typing_idle_ms = typing_idle_ms;
        }

        if let Some(scroll_throttle_ms) = self.scroll_throttle_ms {
            config.scroll_throttle_ms = scroll_throttle_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileReconnectConfig {
    pub enabled: Option<bool>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub max_attempts: Option<u32>,
}

impl FileReconnectConfig {
    fn merge_into(self, config: &mut ReconnectConfig) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }

        if let Some(initial_backoff_ms) = self.initial_backoff_ms {
            config.initial_backoff_ms = initial_backoff_ms;
        }

        if let Some(max_backoff_ms) = self.max_backoff_ms {
            config.max_backoff_ms = max_backoff_ms;
        }

        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileNotificationConfig {
    pub permission: Option<NotificationPermission>,
}

impl FileNotificationConfig {
    fn merge_into(self, config: &mut NotificationConfig) {
        if let Some(permission) = self.permission {
            config.permission = permission;
        }
    }
}

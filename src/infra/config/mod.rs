mod adapter;
mod app_config;
mod file_config;
mod loader;

pub use adapter::FileConfigAdapter;
pub use app_config::{
    AppConfig, ChatConfig, LogConfig, NotificationConfig, ReconnectConfig, ServerConfig,
    SessionConfig,
};
pub use loader::load;

use tokio::runtime::Runtime;
use tracing_appender::non_blocking::WorkerGuard;
use url::Url;

use crate::{
    domain::user::SessionUser,
    infra::{config::AppConfig, storage_layout::StorageLayout},
};

/// Everything a command needs once configuration and logging are up.
pub struct AppContext {
    pub config: AppConfig,
    pub session_user: SessionUser,
    pub server_url: Url,
    pub layout: StorageLayout,
    pub runtime: Runtime,
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        session_user: SessionUser,
        server_url: Url,
        layout: StorageLayout,
        runtime: Runtime,
        log_guard: Option<WorkerGuard>,
    ) -> Self {
        Self {
            config,
            session_user,
            server_url,
            layout,
            runtime,
            _log_guard: log_guard,
        }
    }
}

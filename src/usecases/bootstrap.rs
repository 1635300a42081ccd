use std::{
    path::Path,
    sync::{mpsc, Arc},
    time::Duration,
};

use url::Url;

use crate::{
    domain::{shell_state::ShellState, user::{SessionUser, UserId}},
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter, ReconnectConfig, SessionConfig},
        contracts::ConfigAdapter,
        error::AppError,
        http::RestClient,
        notifier::TerminalNotifier,
        storage_layout::StorageLayout,
    },
    realtime::{ConnectRequest, ConnectionManager, ReconnectPolicy},
    ui::TerminalEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        fetch_worker::FetchWorker,
        shell::DefaultShellOrchestrator,
    },
};

const NETWORK_WORKER_THREADS: usize = 2;

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let layout = StorageLayout::resolve()?;
    let adapter = FileConfigAdapter::new(config_path, &layout.config_dir);
    let (config, session_user, server_url) = build_settings(&adapter)?;

    layout.ensure_dirs()?;
    let log_guard = infra::logging::init(&config.logging, &layout.log_dir)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(NETWORK_WORKER_THREADS)
        .thread_name("rtf-net")
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    Ok(AppContext::new(
        config,
        session_user,
        server_url,
        layout,
        runtime,
        Some(log_guard),
    ))
}

fn build_settings(adapter: &dyn ConfigAdapter) -> Result<(AppConfig, SessionUser, Url), AppError> {
    let config = adapter.load()?;
    let session_user = session_user(&config.session)?;
    let server_url = parse_server_url(&config.server.base_url)?;

    Ok((config, session_user, server_url))
}

/// Wires the realtime channel, REST fallback and notifier into the shell.
pub fn compose_shell(context: &AppContext) -> Result<ShellComposition, AppError> {
    let config = &context.config;
    let cookie = config.session.cookie().map(str::to_owned);
    let (events_tx, events_rx) = mpsc::channel();

    let request = ConnectRequest {
        url: websocket_url(&context.server_url, &config.server.ws_path)?,
        cookie: cookie.clone(),
    };
    let mut frames = ConnectionManager::new(
        context.runtime.handle().clone(),
        request,
        events_tx.clone(),
        reconnect_policy(&config.reconnect),
    );
    frames.connect();

    let rest = RestClient::new(
        context.server_url.clone(),
        cookie,
        Duration::from_millis(config.server.request_timeout_ms),
    );
    let fetches = FetchWorker::new(Arc::new(rest), events_tx);
    let notifier = TerminalNotifier::new(config.notifications.permission);

    let state = ShellState::new(
        context.session_user.clone(),
        Duration::from_millis(config.chat.typing_idle_ms),
        Duration::from_millis(config.chat.scroll_throttle_ms),
    );

    Ok(ShellComposition {
        event_source: Box::new(TerminalEventSource::new(events_rx)),
        orchestrator: Box::new(DefaultShellOrchestrator::new(
            state, frames, notifier, fetches,
        )),
    })
}

fn session_user(session: &SessionConfig) -> Result<SessionUser, AppError> {
    if session.user_id <= 0 {
        return Err(AppError::ConfigInvalid {
            details: "session.user_id must be set to your forum account id".to_owned(),
        });
    }

    let username = session.username.trim();
    if username.is_empty() {
        return Err(AppError::ConfigInvalid {
            details: "session.username must not be empty".to_owned(),
        });
    }

    Ok(SessionUser::new(UserId(session.user_id), username))
}

fn parse_server_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw).map_err(|source| AppError::InvalidServerUrl {
        url: raw.to_owned(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::ConfigInvalid {
            details: format!("server.base_url must use http or https, got {other}"),
        }),
    }
}

/// The realtime endpoint for `base`: `ws` for `http`, `wss` for `https`.
pub fn websocket_url(base: &Url, ws_path: &str) -> Result<Url, AppError> {
    let scheme = match base.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(AppError::ConfigInvalid {
                details: format!("cannot derive a websocket endpoint from {other} url"),
            })
        }
    };

    let mut url = base.clone();
    url.set_scheme(scheme).map_err(|()| AppError::ConfigInvalid {
        details: format!("cannot switch {base} to {scheme}"),
    })?;
    let base_path = base.path().trim_end_matches('/');
    url.set_path(&format!("{base_path}/{}", ws_path.trim_start_matches('/')));
    url.set_query(None);

    Ok(url)
}

fn reconnect_policy(config: &ReconnectConfig) -> ReconnectPolicy {
    ReconnectPolicy {
        enabled: config.enabled,
        initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        max_backoff: Duration::from_millis(config.max_backoff_ms),
        max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    struct FixedConfig(AppConfig);

    impl ConfigAdapter for FixedConfig {
        fn load(&self) -> Result<AppConfig, AppError> {
            Ok(self.0.clone())
        }
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("url must parse")
    }

    #[test]
    fn default_config_is_rejected_until_session_is_set() {
        let error = build_settings(&FixedConfig(AppConfig::default()))
            .expect_err("default session must be rejected");

        assert!(matches!(error, AppError::ConfigInvalid { .. }));
    }

    #[test]
    fn builds_settings_from_config_file() {
        let temp_dir = tempfile::tempdir().expect("temp dir must be created");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[session]\nuser_id = 7\nusername = \" alice \"\n\n[server]\nbase_url = \"http://forum.local:8080\"\n",
        )
        .expect("must write test config");

        let adapter = FileConfigAdapter::new(Some(&config_path), temp_dir.path());
        let (config, user, server_url) =
            build_settings(&adapter).expect("settings must build");

        assert_eq!(user, SessionUser::new(UserId(7), "alice"));
        assert_eq!(server_url.as_str(), "http://forum.local:8080/");
        assert_eq!(config.chat.typing_idle_ms, 5_000);
    }

    #[test]
    fn websocket_url_follows_transport_security() {
        assert_eq!(
            websocket_url(&url("https://forum.local"), "/ws")
                .expect("url must convert")
                .as_str(),
            "wss://forum.local/ws"
        );
        assert_eq!(
            websocket_url(&url("http://localhost:8080/app/"), "ws")
                .expect("url must convert")
                .as_str(),
            "ws://localhost:8080/app/ws"
        );
    }

    #[test]
    fn server_url_must_be_http() {
        assert!(matches!(
            parse_server_url("ftp://forum.local"),
            Err(AppError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            parse_server_url("not a url"),
            Err(AppError::InvalidServerUrl { .. })
        ));
    }

    #[test]
    fn zero_attempts_means_unlimited_reconnects() {
        let policy = reconnect_policy(&ReconnectConfig::default());

        assert!(policy.enabled);
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.initial_backoff, Duration::from_millis(500));
    }
}

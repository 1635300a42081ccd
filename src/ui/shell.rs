use anyhow::Result;

use crate::{
    domain::shell_state::ShellState,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
    },
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        server = %context.config.server.base_url,
        user = %context.session_user.username,
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;
    drive(event_source, orchestrator, |state| {
        terminal.draw(|frame| view::render(frame, state))
    })
}

/// Draws, then handles one event, until the orchestrator stops.
fn drive<D>(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut draw: D,
) -> Result<()>
where
    D: FnMut(&mut ShellState) -> Result<()>,
{
    orchestrator.start();

    while orchestrator.state().is_running() {
        draw(orchestrator.state_mut())?;

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        domain::{
            events::{AppEvent, KeyInput},
            notification::NotificationPermission,
            user::{SessionUser, UserId},
        },
        infra::stubs::{RecordingFetches, RecordingSink, StubNotifier},
        ui::event_source::MockEventSource,
        usecases::shell::DefaultShellOrchestrator,
    };

    fn orchestrator() -> DefaultShellOrchestrator<RecordingSink, StubNotifier, RecordingFetches> {
        DefaultShellOrchestrator::new(
            ShellState::new(
                SessionUser::new(UserId(1), "me"),
                Duration::from_secs(5),
                Duration::from_millis(200),
            ),
            RecordingSink::connected(),
            StubNotifier::with_permission(NotificationPermission::Denied),
            RecordingFetches::default(),
        )
    }

    #[test]
    fn mock_source_produces_quit_event() {
        let mut source = MockEventSource::from(vec![AppEvent::QuitRequested]);
        let event = source.next_event().expect("must read mock event");

        assert_eq!(event, Some(AppEvent::QuitRequested));
    }

    #[test]
    fn loop_draws_until_quit() {
        let mut source = MockEventSource::from(vec![
            AppEvent::Tick,
            AppEvent::InputKey(KeyInput::new("j", false)),
            AppEvent::InputKey(KeyInput::new("q", false)),
        ]);
        let mut orchestrator = orchestrator();
        let mut frames = 0;

        drive(&mut source, &mut orchestrator, |_| {
            frames += 1;
            Ok(())
        })
        .expect("loop must finish");

        assert!(!orchestrator.state().is_running());
        assert_eq!(frames, 3);
    }
}

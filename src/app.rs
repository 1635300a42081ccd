use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::{
    cli::{Cli, Command},
    domain::{roster::RosterEntry, time_labels::format_time_ago},
    infra::http::RestClient,
    ui,
    usecases::{bootstrap, context::AppContext, list_users::list_users},
};

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;
    tracing::debug!(
        user = %context.session_user.username,
        log_dir = %context.layout.log_dir.display(),
        "configuration loaded"
    );

    match cli.command_or_default() {
        Command::Run => {
            let mut shell = bootstrap::compose_shell(&context)?;
            ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
            )?;
        }
        Command::Roster => print_roster(&context)?,
    }

    Ok(())
}

fn print_roster(context: &AppContext) -> Result<()> {
    let client = RestClient::new(
        context.server_url.clone(),
        context.config.session.cookie().map(str::to_owned),
        std::time::Duration::from_millis(context.config.server.request_timeout_ms),
    );

    let entries = list_users(&client, context.session_user.id)
        .map_err(|failure| anyhow::anyhow!("{failure}"))
        .context("failed to load users")?;

    for line in roster_lines(&entries, Utc::now()) {
        println!("{line}");
    }

    Ok(())
}

fn roster_lines(entries: &[RosterEntry], now: DateTime<Utc>) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No other users yet.".to_owned()];
    }

    entries
        .iter()
        .map(|entry| {
            let time = format_time_ago(entry.last_message_timestamp, now);
            let mut line = format!(
                "{:<7} {}",
                entry.online_status.as_label(),
                entry.username
            );
            let summary = entry.last_message_label();
            if !summary.is_empty() {
                line.push_str(&format!(" | {summary}"));
            }
            if !time.is_empty() {
                line.push_str(&format!(" ({time})"));
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{roster::OnlineStatus, user::UserId};

    fn entry(username: &str, body: &str, unix_seconds: i64) -> RosterEntry {
        RosterEntry {
            user_id: UserId(2),
            username: username.to_owned(),
            last_message_sender: if body.is_empty() {
                String::new()
            } else {
                username.to_owned()
            },
            last_message_body: body.to_owned(),
            last_message_timestamp: DateTime::from_timestamp(unix_seconds, 0)
                .expect("valid timestamp"),
            online_status: OnlineStatus::Online,
        }
    }

    #[test]
    fn roster_lines_show_presence_summary_and_age() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");

        let lines = roster_lines(&[entry("bob", "hi", 1_700_000_000 - 180)], now);

        assert_eq!(lines, vec!["online  bob | bob: hi (3 minutes ago)".to_owned()]);
    }

    #[test]
    fn roster_lines_skip_missing_summary_and_time() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");

        let lines = roster_lines(&[entry("carol", "", 0)], now);

        assert_eq!(lines, vec!["online  carol".to_owned()]);
    }

    #[test]
    fn empty_roster_says_so() {
        assert_eq!(roster_lines(&[], Utc::now()), vec!["No other users yet."]);
    }
}

use crate::domain::{events::FetchFailure, roster::RosterEntry, user::UserId};

use super::contracts::SourceError;

pub trait RosterSource {
    fn list_users(&self, local_user: UserId) -> Result<Vec<RosterEntry>, SourceError>;
}

impl<T> RosterSource for &T
where
    T: RosterSource + ?Sized,
{
    fn list_users(&self, local_user: UserId) -> Result<Vec<RosterEntry>, SourceError> {
        (*self).list_users(local_user)
    }
}

/// Loads the roster as the server orders it, without the session user.
pub fn list_users(
    source: &dyn RosterSource,
    local_user: UserId,
) -> Result<Vec<RosterEntry>, FetchFailure> {
    let entries = source.list_users(local_user).map_err(FetchFailure::from)?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.user_id != local_user)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster::OnlineStatus;

    struct StubSource {
        result: Result<Vec<RosterEntry>, SourceError>,
    }

    impl RosterSource for StubSource {
        fn list_users(&self, _local_user: UserId) -> Result<Vec<RosterEntry>, SourceError> {
            self.result.clone()
        }
    }

    fn entry(id: i64, username: &str) -> RosterEntry {
        RosterEntry {
            user_id: UserId(id),
            username: username.to_owned(),
            last_message_sender: String::new(),
            last_message_body: String::new(),
            last_message_timestamp: Default::default(),
            online_status: OnlineStatus::Online,
        }
    }

    #[test]
    fn keeps_server_order_and_drops_session_user() {
        let source = StubSource {
            result: Ok(vec![entry(3, "carol"), entry(1, "me"), entry(2, "bob")]),
        };

        let entries = list_users(&source, UserId(1)).expect("list must succeed");

        let names: Vec<_> = entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["carol", "bob"]);
    }

    #[test]
    fn maps_invalid_data_to_fetch_failure() {
        let source = StubSource {
            result: Err(SourceError::InvalidData("expected array".to_owned())),
        };

        let failure = list_users(&source, UserId(1)).expect_err("list must fail");

        assert_eq!(failure.status, None);
        assert!(failure.message.contains("expected array"));
    }
}

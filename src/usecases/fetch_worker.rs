//! Runs REST loads off the UI thread and posts their results as events.

use std::{
    sync::{mpsc::Sender, Arc},
    thread,
};

use crate::domain::{events::AppEvent, user::UserId};

use super::{
    contracts::{FetchRequests, HistoryRequest},
    list_users::{list_users, RosterSource},
    load_history::{load_history, HistoryQuery, MessagesSource},
};

const FETCH_SPAWN_FAILED: &str = "FETCH_SPAWN_FAILED";
const FETCH_RESULT_DROPPED: &str = "FETCH_RESULT_DROPPED";

pub struct FetchWorker<S> {
    source: Arc<S>,
    events: Sender<AppEvent>,
}

impl<S> FetchWorker<S>
where
    S: MessagesSource + RosterSource + Send + Sync + 'static,
{
    pub fn new(source: Arc<S>, events: Sender<AppEvent>) -> Self {
        Self { source, events }
    }

    fn spawn(&self, name: &str, job: impl FnOnce(&S) -> AppEvent + Send + 'static) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        let spawned = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                let event = job(source.as_ref());
                if events.send(event).is_err() {
                    tracing::debug!(code = FETCH_RESULT_DROPPED, "event loop is gone");
                }
            });

        if let Err(error) = spawned {
            tracing::warn!(code = FETCH_SPAWN_FAILED, error = %error, "failed to spawn fetch thread");
        }
    }
}

impl<S> FetchRequests for FetchWorker<S>
where
    S: MessagesSource + RosterSource + Send + Sync + 'static,
{
    fn request_roster(&self, local_user: UserId) {
        self.spawn("rtf-roster-fetch", move |source| {
            AppEvent::RosterFetched(list_users(source, local_user))
        });
    }

    fn request_history(&self, request: HistoryRequest) {
        self.spawn("rtf-history-fetch", move |source| {
            let result = load_history(
                source,
                HistoryQuery {
                    local_user: request.local_user,
                    peer: request.peer,
                },
            );

            AppEvent::HistoryFetched {
                peer: request.peer,
                generation: request.generation,
                result,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use super::*;
    use crate::{
        domain::{message::message_at, message::Message, roster::RosterEntry},
        usecases::contracts::SourceError,
    };

    struct StubSource;

    impl MessagesSource for StubSource {
        fn list_messages(
            &self,
            sender: UserId,
            receiver: UserId,
        ) -> Result<Vec<Message>, SourceError> {
            Ok(vec![message_at(sender.0, receiver.0, "hi", 100)])
        }
    }

    impl RosterSource for StubSource {
        fn list_users(&self, _local_user: UserId) -> Result<Vec<RosterEntry>, SourceError> {
            Err(SourceError::Status {
                status: 500,
                message: "Internal Server Error".to_owned(),
            })
        }
    }

    #[test]
    fn history_result_carries_peer_and_generation() {
        let (events_tx, events_rx) = mpsc::channel();
        let worker = FetchWorker::new(Arc::new(StubSource), events_tx);

        worker.request_history(HistoryRequest {
            local_user: UserId(1),
            peer: UserId(2),
            generation: 7,
        });

        let event = events_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("history event must arrive");
        let AppEvent::HistoryFetched {
            peer,
            generation,
            result,
        } = event
        else {
            panic!("expected history event");
        };
        assert_eq!(peer, UserId(2));
        assert_eq!(generation, 7);
        assert_eq!(result.expect("history must load").len(), 1);
    }

    #[test]
    fn roster_failure_is_posted_as_event() {
        let (events_tx, events_rx) = mpsc::channel();
        let worker = FetchWorker::new(Arc::new(StubSource), events_tx);

        worker.request_roster(UserId(1));

        let event = events_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("roster event must arrive");
        let AppEvent::RosterFetched(Err(failure)) = event else {
            panic!("expected failed roster event");
        };
        assert_eq!(failure.status, Some(500));
    }
}

//! One websocket session to the chat server.
//!
//! A `Connection` moves through Connecting, Open, then Closed or Errored and
//! never comes back; the manager replaces it when a new session is needed.

use std::{
    sync::{mpsc::Sender, Arc, Mutex},
    time::Duration,
};

use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tokio::{net::TcpStream, runtime::Handle, sync::mpsc, time::timeout};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        handshake::client::Request,
        http::{header::COOKIE, HeaderValue},
        Message as WsMessage,
    },
    MaybeTlsStream, WebSocketStream,
};
use url::Url;

use crate::{
    domain::{connection::ConnectionState, events::AppEvent},
    protocol::{decode_inbound, FrameError, OutboundFrame, SendError},
};

use super::duration_ms;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const CONNECTION_OPENED: &str = "REALTIME_CONNECTION_OPENED";
const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
const TRANSPORT_CLOSED: &str = "TRANSPORT_CLOSED";
const UNKNOWN_FRAME_KIND: &str = "UNKNOWN_FRAME_KIND";
const MALFORMED_FRAME: &str = "MALFORMED_FRAME";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where and how to open the realtime channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub url: Url,
    /// Full `Cookie` header value carrying the forum session.
    pub cookie: Option<String>,
}

#[derive(Debug)]
pub struct Connection {
    id: u64,
    state: Arc<Mutex<ConnectionState>>,
    outbound_tx: mpsc::UnboundedSender<String>,
}

impl Connection {
    pub fn open(runtime: &Handle, id: u64, request: ConnectRequest, events: Sender<AppEvent>) -> Self {
        let state = Arc::new(Mutex::new(ConnectionState::Connecting));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let publisher = StatePublisher {
            id,
            state: Arc::clone(&state),
            events: events.clone(),
        };
        runtime.spawn(run_connection(request, publisher, outbound_rx, events));

        Self {
            id,
            state,
            outbound_tx,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(ConnectionState::Errored)
    }

    /// Hands the frame to the socket writer. Nothing is queued for later: a
    /// connection that is not open rejects the frame.
    pub fn send(&self, frame: &OutboundFrame) -> Result<(), SendError> {
        if self.state() != ConnectionState::Open {
            return Err(SendError::NotConnected);
        }

        let text = frame.encode()?;
        self.outbound_tx
            .send(text)
            .map_err(|_| SendError::NotConnected)
    }
}

struct StatePublisher {
    id: u64,
    state: Arc<Mutex<ConnectionState>>,
    events: Sender<AppEvent>,
}

impl StatePublisher {
    fn publish(&self, next: ConnectionState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }

        let _ = self.events.send(AppEvent::ConnectionChanged {
            connection: self.id,
            state: next,
        });
    }
}

async fn run_connection(
    request: ConnectRequest,
    publisher: StatePublisher,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    events: Sender<AppEvent>,
) {
    publisher.publish(ConnectionState::Connecting);

    let handshake = match build_handshake(&request) {
        Ok(handshake) => handshake,
        Err(error) => {
            tracing::error!(
                code = TRANSPORT_ERROR,
                connection = publisher.id,
                error = %error,
                "invalid realtime handshake request"
            );
            publisher.publish(ConnectionState::Errored);
            return;
        }
    };

    let ws_stream = match timeout(CONNECT_TIMEOUT, connect_async(handshake)).await {
        Ok(Ok((ws_stream, _response))) => ws_stream,
        Ok(Err(error)) => {
            tracing::warn!(
                code = TRANSPORT_ERROR,
                connection = publisher.id,
                url = %request.url,
                error = %error,
                "realtime connect failed"
            );
            publisher.publish(ConnectionState::Errored);
            return;
        }
        Err(_) => {
            tracing::warn!(
                code = TRANSPORT_ERROR,
                connection = publisher.id,
                url = %request.url,
                timeout_ms = duration_ms(CONNECT_TIMEOUT),
                "realtime connect timed out"
            );
            publisher.publish(ConnectionState::Errored);
            return;
        }
    };

    tracing::info!(
        code = CONNECTION_OPENED,
        connection = publisher.id,
        url = %request.url,
        "realtime channel open"
    );
    publisher.publish(ConnectionState::Open);

    let (write_half, read_half) = ws_stream.split();
    let mut send_task = tokio::spawn(send_loop(write_half, outbound_rx));
    let mut receive_task = tokio::spawn(receive_loop(read_half, events));

    let outcome = tokio::select! {
        outcome = &mut send_task => {
            receive_task.abort();
            outcome.unwrap_or(ConnectionState::Errored)
        }
        outcome = &mut receive_task => {
            send_task.abort();
            outcome.unwrap_or(ConnectionState::Errored)
        }
    };

    publisher.publish(outcome);
}

fn build_handshake(request: &ConnectRequest) -> Result<Request, tungstenite::Error> {
    let mut handshake = request.url.as_str().into_client_request()?;

    if let Some(cookie) = request.cookie.as_deref() {
        let value = HeaderValue::from_str(cookie)
            .map_err(|error| tungstenite::Error::HttpFormat(error.into()))?;
        handshake.headers_mut().insert(COOKIE, value);
    }

    Ok(handshake)
}

/// Sole writer of the socket; ends when the owning `Connection` is dropped.
async fn send_loop(
    mut ws_write: SplitSink<WsStream, WsMessage>,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
) -> ConnectionState {
    while let Some(text) = outbound_rx.recv().await {
        if let Err(error) = ws_write.send(WsMessage::Text(text.into())).await {
            tracing::warn!(code = TRANSPORT_ERROR, error = %error, "realtime write failed");
            return ConnectionState::Errored;
        }
    }

    let _ = ws_write.close().await;
    ConnectionState::Closed
}

async fn receive_loop(
    mut ws_read: SplitStream<WsStream>,
    events: Sender<AppEvent>,
) -> ConnectionState {
    while let Some(next) = ws_read.next().await {
        match next {
            Ok(WsMessage::Text(text)) => {
                if let Some(event) = decode_event(text.as_str()) {
                    if events.send(event).is_err() {
                        return ConnectionState::Closed;
                    }
                }
            }
            Ok(WsMessage::Close(frame)) => {
                tracing::info!(
                    code = TRANSPORT_CLOSED,
                    reason = ?frame.map(|frame| frame.reason.as_str().to_owned()),
                    "realtime channel closed by server"
                );
                return ConnectionState::Closed;
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(code = TRANSPORT_ERROR, error = %error, "realtime read failed");
                return ConnectionState::Errored;
            }
        }
    }

    tracing::info!(code = TRANSPORT_CLOSED, "realtime stream ended");
    ConnectionState::Closed
}

fn decode_event(text: &str) -> Option<AppEvent> {
    match decode_inbound(text) {
        Ok(frame) => Some(AppEvent::FrameReceived(frame)),
        Err(FrameError::UnknownFrameKind { kind }) => {
            tracing::warn!(code = UNKNOWN_FRAME_KIND, kind = %kind, "dropping frame of unknown kind");
            None
        }
        Err(error) => {
            tracing::warn!(code = MALFORMED_FRAME, error = %error, "dropping malformed frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc as std_mpsc, time::Duration};

    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    use super::*;
    use crate::{domain::user::UserId, protocol::InboundFrame};

    const WAIT: Duration = Duration::from_secs(5);

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("runtime must build")
    }

    fn next_state(events: &std_mpsc::Receiver<AppEvent>) -> ConnectionState {
        loop {
            match events.recv_timeout(WAIT).expect("event must arrive") {
                AppEvent::ConnectionChanged { state, .. } => return state,
                _ => continue,
            }
        }
    }

    #[test]
    fn unknown_and_malformed_frames_are_dropped() {
        assert!(decode_event(r#"{"type":"Reaction"}"#).is_none());
        assert!(decode_event("{").is_none());
        assert!(matches!(
            decode_event(r#"{"type":"IsTyping","Sender":2,"isTyping":false}"#),
            Some(AppEvent::FrameReceived(InboundFrame::Typing { .. }))
        ));
    }

    #[test]
    fn handshake_carries_session_cookie() {
        let request = ConnectRequest {
            url: Url::parse("ws://localhost:8080/ws").expect("url must parse"),
            cookie: Some("session_token=abc".to_owned()),
        };

        let handshake = build_handshake(&request).expect("handshake must build");

        assert_eq!(
            handshake.headers().get(COOKIE).map(HeaderValue::as_bytes),
            Some("session_token=abc".as_bytes())
        );
    }

    #[test]
    fn refused_connection_ends_errored_and_rejects_sends() {
        let runtime = runtime();
        let (events_tx, events_rx) = std_mpsc::channel();
        let listener = runtime
            .block_on(TcpListener::bind("127.0.0.1:0"))
            .expect("listener must bind");
        let address = listener.local_addr().expect("listener must have address");
        drop(listener);

        let request = ConnectRequest {
            url: Url::parse(&format!("ws://{address}/ws")).expect("url must parse"),
            cookie: None,
        };
        let connection = Connection::open(runtime.handle(), 1, request, events_tx);

        assert_eq!(next_state(&events_rx), ConnectionState::Connecting);
        assert_eq!(next_state(&events_rx), ConnectionState::Errored);
        assert!(matches!(
            connection.send(&OutboundFrame::LoadUsers),
            Err(SendError::NotConnected)
        ));
    }

    #[test]
    fn open_connection_exchanges_frames_in_order() {
        let runtime = runtime();
        let (events_tx, events_rx) = std_mpsc::channel();
        let listener = runtime
            .block_on(TcpListener::bind("127.0.0.1:0"))
            .expect("listener must bind");
        let address = listener.local_addr().expect("listener must have address");
        let (seen_tx, seen_rx) = std_mpsc::channel();

        runtime.spawn(async move {
            let (stream, _) = listener.accept().await.expect("client must connect");
            let mut socket = accept_async(stream).await.expect("handshake must succeed");
            for frame in [
                r#"{"type":"IsTyping","Sender":2,"isTyping":true}"#,
                r#"{"type":"Mystery"}"#,
                r#"{"type":"IsTyping","Sender":2,"isTyping":false}"#,
            ] {
                socket
                    .send(WsMessage::Text(frame.to_owned().into()))
                    .await
                    .expect("server must send");
            }
            if let Some(Ok(WsMessage::Text(text))) = socket.next().await {
                let _ = seen_tx.send(text.as_str().to_owned());
            }
        });

        let request = ConnectRequest {
            url: Url::parse(&format!("ws://{address}/ws")).expect("url must parse"),
            cookie: None,
        };
        let connection = Connection::open(runtime.handle(), 7, request, events_tx);

        assert_eq!(next_state(&events_rx), ConnectionState::Connecting);
        assert_eq!(next_state(&events_rx), ConnectionState::Open);
        assert_eq!(connection.state(), ConnectionState::Open);

        let typing: Vec<bool> = (0..2)
            .map(|_| match events_rx.recv_timeout(WAIT).expect("frame must arrive") {
                AppEvent::FrameReceived(InboundFrame::Typing { sender, is_typing }) => {
                    assert_eq!(sender, UserId(2));
                    is_typing
                }
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(typing, vec![true, false]);

        connection
            .send(&OutboundFrame::LoadUsers)
            .expect("open connection must accept frames");
        assert_eq!(
            seen_rx.recv_timeout(WAIT).expect("server must receive frame"),
            r#"{"type":"loadUsers"}"#
        );
    }
}

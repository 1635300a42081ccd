//! Blocking REST client for the forum's data endpoints.

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    domain::{message::Message, roster::RosterEntry, user::UserId},
    protocol::{WireMessage, WireUser},
    usecases::{contracts::SourceError, list_users::RosterSource, load_history::MessagesSource},
};

const USERS_PATH: &str = "Data-Users";
const MESSAGES_PATH: &str = "Data-Message";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: String,
}

#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: Url,
    cookie: Option<String>,
    timeout: Duration,
}

impl RestClient {
    pub fn new(base_url: Url, cookie: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url,
            cookie,
            timeout,
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{base_path}/{path}"));
        url.set_query(None);

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>, SourceError> {
        let mut request = ureq::get(url.as_str())
            .header("Accept", "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .config()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build();
        if let Some(cookie) = &self.cookie {
            request = request.header("Cookie", cookie);
        }

        let mut response = request
            .call()
            .map_err(|error| SourceError::Transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|error| SourceError::Transport(error.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        serde_json::from_str(&body).map_err(|error| SourceError::InvalidData(error.to_string()))
    }
}

impl RosterSource for RestClient {
    fn list_users(&self, local_user: UserId) -> Result<Vec<RosterEntry>, SourceError> {
        let url = self.endpoint(USERS_PATH, &[("user", local_user.to_string())]);
        let users: Option<Vec<WireUser>> = self.get_json(&url)?;

        Ok(users
            .unwrap_or_default()
            .into_iter()
            .map(WireUser::into_entry)
            .collect())
    }
}

impl MessagesSource for RestClient {
    fn list_messages(&self, sender: UserId, receiver: UserId) -> Result<Vec<Message>, SourceError> {
        let url = self.endpoint(
            MESSAGES_PATH,
            &[("sender", sender.to_string()), ("receiver", receiver.to_string())],
        );
        let messages: Option<Vec<WireMessage>> = self.get_json(&url)?;

        Ok(messages
            .unwrap_or_default()
            .into_iter()
            .map(WireMessage::into_message)
            .collect())
    }
}

/// The server's `errorMessage`, else the raw body, else the status reason.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error_message.trim().is_empty() {
            return parsed.error_message;
        }
    }

    let text = body.trim();
    if !text.is_empty() {
        return text.to_owned();
    }

    reason.unwrap_or("request failed").to_owned()
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    use super::*;

    fn client(base: &str) -> RestClient {
        RestClient::new(
            Url::parse(base).expect("base url must parse"),
            Some("session=abc".to_owned()),
            Duration::from_secs(5),
        )
    }

    /// Answers a single request with `status_line` and `body`, returning the base URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener must bind");
        let address = listener.local_addr().expect("listener must have address");

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("client must connect");
            let mut request = Vec::new();
            let mut buffer = [0_u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = stream.read(&mut buffer).expect("request must be readable");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("response must be writable");
        });

        format!("http://{address}")
    }

    #[test]
    fn endpoints_keep_base_path_and_encode_query() {
        let client = client("https://forum.local/app/");

        let url = client.endpoint(
            MESSAGES_PATH,
            &[("sender", "1".to_owned()), ("receiver", "2".to_owned())],
        );

        assert_eq!(
            url.as_str(),
            "https://forum.local/app/Data-Message?sender=1&receiver=2"
        );
    }

    #[test]
    fn error_message_prefers_server_field() {
        assert_eq!(
            error_message(r#"{"errorMessage":"Page Not Found","statuscode":404}"#, Some("Not Found")),
            "Page Not Found"
        );
        assert_eq!(error_message("teapot", Some("I'm a teapot")), "teapot");
        assert_eq!(error_message("", Some("Not Found")), "Not Found");
    }

    #[test]
    fn lists_users_from_server() {
        let base = serve_once(
            "200 OK",
            r#"[{"UserID":2,"username":"bob","lastMessage":"hi","sender":"bob","timestamp":"2024-01-01T10:00:00Z","status":"online"}]"#,
        );

        let entries = client(&base)
            .list_users(UserId(1))
            .expect("users must load");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "bob");
        assert_eq!(entries[0].last_message_body, "hi");
    }

    #[test]
    fn null_history_is_empty() {
        let base = serve_once("200 OK", "null");

        let messages = client(&base)
            .list_messages(UserId(1), UserId(2))
            .expect("messages must load");

        assert!(messages.is_empty());
    }

    #[test]
    fn non_success_status_carries_server_message() {
        let base = serve_once(
            "401 Unauthorized",
            r#"{"errorMessage":"Unauthorized","statuscode":401}"#,
        );

        let error = client(&base)
            .list_users(UserId(1))
            .expect_err("request must fail");

        assert_eq!(
            error,
            SourceError::Status {
                status: 401,
                message: "Unauthorized".to_owned(),
            }
        );
    }
}

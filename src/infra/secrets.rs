//! Keeps the session cookie and similar credentials out of panic output.

use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_KEYS: [&str; 5] = ["cookie", "session", "token", "password", "secret"];

/// Replaces values of `key=value` and `Key: value` pairs whose key looks sensitive.
pub fn redact_text(input: &str) -> String {
    let mut redact_next = false;
    let mut chunks = Vec::new();

    for chunk in input.split_whitespace() {
        if redact_next {
            chunks.push(REDACTED.to_owned());
            redact_next = false;
            continue;
        }

        if let Some((key, _)) = chunk.split_once('=') {
            if is_sensitive_key(key) {
                chunks.push(format!("{key}={REDACTED}"));
                continue;
            }
        }

        if let Some(key) = chunk.strip_suffix(':') {
            redact_next = is_sensitive_key(key);
        }
        chunks.push(chunk.to_owned());
    }

    chunks.join(" ")
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        match panic_info.location() {
            Some(location) => eprintln!(
                "rtf panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            ),
            None => eprintln!("rtf panic: {scrubbed}"),
        }
    }));
}

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|marker| lowered.contains(marker))
}

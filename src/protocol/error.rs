use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("frame has no `type` tag")]
    MissingKind,
    #[error("unknown frame kind `{kind}`")]
    UnknownFrameKind { kind: String },
    #[error("malformed `{kind}` frame: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode `{kind}` frame: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("realtime channel is not open")]
    NotConnected,
    #[error(transparent)]
    Frame(#[from] FrameError),
}

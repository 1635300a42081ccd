#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Errored,
}

impl ConnectionState {
    /// Closed and errored connections never reopen; a new one must be created.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "online",
            Self::Closed => "disconnected",
            Self::Errored => "connection error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_closed_and_errored_are_terminal() {
        assert!(!ConnectionState::Connecting.is_terminal());
        assert!(!ConnectionState::Open.is_terminal());
        assert!(ConnectionState::Closed.is_terminal());
        assert!(ConnectionState::Errored.is_terminal());
    }
}

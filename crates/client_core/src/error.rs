use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Config(String),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("unexpected {endpoint} payload: {reason}")]
    Payload {
        endpoint: &'static str,
        reason: String,
    },
}

impl ClientError {
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => None,
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Payload { endpoint, .. } => Some(endpoint),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn payload(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::Payload {
            endpoint,
            reason: reason.into(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

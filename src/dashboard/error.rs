//! Fetch failures for the dashboard stats request.

use thiserror::Error;

/// Why the dashboard payload could not be obtained.
///
/// All variants collapse into the same "failed to load" display state; the
/// distinction only feeds the activity log.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No access token was available at fetch time; no request was sent.
    #[error("no access token available")]
    MissingToken,

    /// Connection, DNS, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(#[source] Box<ureq::Transport>),

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {code}")]
    Status { code: u16 },

    /// The body was not a valid `{ data: DashboardStats }` document.
    #[error("malformed dashboard payload: {0}")]
    Malformed(#[source] std::io::Error),
}

impl FetchError {
    /// HTTP status, if the backend answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code } => Some(*code),
            _ => None,
        }
    }

    /// Short machine-readable name, used in the activity log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Status { code },
            ureq::Error::Transport(transport) => Self::Network(Box::new(transport)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_only_for_status_variant() {
        assert_eq!(FetchError::Status { code: 503 }.status_code(), Some(503));
        assert_eq!(FetchError::MissingToken.status_code(), None);
    }

    #[test]
    fn kinds_and_messages() {
        let err = FetchError::Status { code: 500 };
        assert_eq!(err.kind(), "status");
        assert_eq!(err.to_string(), "backend returned HTTP 500");

        let err = FetchError::Malformed(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "expected value",
        ));
        assert_eq!(err.kind(), "malformed");
        assert!(err.to_string().contains("expected value"));
    }
}

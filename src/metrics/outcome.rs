/// HTTP status treated as a successful request.
pub const OK_STATUS: u16 = 200;

/// Why a request never produced an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect,
    Body,
    Other,
}

impl TransportFailure {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportFailure::Timeout => "timeout",
            TransportFailure::Connect => "connect",
            TransportFailure::Body => "body",
            TransportFailure::Other => "other",
        }
    }
}

/// Classified result of a single GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failed(u16),
    TransportError(TransportFailure),
}

impl RequestOutcome {
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status == OK_STATUS {
            RequestOutcome::Success
        } else {
            RequestOutcome::Failed(status)
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, RequestOutcome::Success)
    }
}

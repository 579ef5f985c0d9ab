use thiserror::Error;

pub const NO_CONNECTIVITY_MESSAGE: &str = "no internet connection";
pub const NO_LOCATION_SELECTED_MESSAGE: &str = "no location selected";
pub const CACHE_FAILURE_MESSAGE: &str = "cache failure";
pub const PARSE_FAILURE_MESSAGE: &str = "malformed server payload";
pub const UNKNOWN_FAILURE_MESSAGE: &str = "unknown failure";

/// The closed set of failure kinds that cross the repository boundary.
///
/// Every variant carries a human readable message and, optionally, a capture
/// of the originating failure context. Consumers discriminate by variant
/// only; there are no machine parseable codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("{message}")]
    Server {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    Authentication {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    Validation {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    NotFound {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    Network {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    Timeout {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    Cache {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    Parse {
        message: String,
        trace: Option<String>,
    },
    #[error("{message}")]
    Unknown {
        message: String,
        trace: Option<String>,
    },
}

impl Failure {
    pub fn server(message: impl Into<String>) -> Self {
        Failure::Server {
            message: message.into(),
            trace: None,
        }
    }

    pub fn server_with_trace(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Failure::Server {
            message: message.into(),
            trace: Some(trace.into()),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Failure::Authentication {
            message: message.into(),
            trace: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Failure::Validation {
            message: message.into(),
            trace: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Failure::NotFound {
            message: message.into(),
            trace: None,
        }
    }

    /// Connectivity oracle reported the network as unreachable.
    pub fn no_connectivity() -> Self {
        Failure::Network {
            message: NO_CONNECTIVITY_MESSAGE.to_owned(),
            trace: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Failure::Timeout {
            message: message.into(),
            trace: None,
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Failure::Cache {
            message: message.into(),
            trace: None,
        }
    }

    pub fn cache_with_trace(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Failure::Cache {
            message: message.into(),
            trace: Some(trace.into()),
        }
    }

    /// The single cached entry is absent.
    pub fn no_location_selected() -> Self {
        Failure::cache(NO_LOCATION_SELECTED_MESSAGE)
    }

    pub fn cache_failure() -> Self {
        Failure::cache(CACHE_FAILURE_MESSAGE)
    }

    pub fn parse(trace: impl Into<String>) -> Self {
        Failure::Parse {
            message: PARSE_FAILURE_MESSAGE.to_owned(),
            trace: Some(trace.into()),
        }
    }

    pub fn unknown() -> Self {
        Failure::Unknown {
            message: UNKNOWN_FAILURE_MESSAGE.to_owned(),
            trace: None,
        }
    }

    pub fn unknown_with_trace(trace: impl Into<String>) -> Self {
        Failure::Unknown {
            message: UNKNOWN_FAILURE_MESSAGE.to_owned(),
            trace: Some(trace.into()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Failure::Server { message, .. }
            | Failure::Authentication { message, .. }
            | Failure::Validation { message, .. }
            | Failure::NotFound { message, .. }
            | Failure::Network { message, .. }
            | Failure::Timeout { message, .. }
            | Failure::Cache { message, .. }
            | Failure::Parse { message, .. }
            | Failure::Unknown { message, .. } => message,
        }
    }

    pub fn trace(&self) -> Option<&str> {
        match self {
            Failure::Server { trace, .. }
            | Failure::Authentication { trace, .. }
            | Failure::Validation { trace, .. }
            | Failure::NotFound { trace, .. }
            | Failure::Network { trace, .. }
            | Failure::Timeout { trace, .. }
            | Failure::Cache { trace, .. }
            | Failure::Parse { trace, .. }
            | Failure::Unknown { trace, .. } => trace.as_deref(),
        }
    }
}

use thiserror::Error;

/// Result type alias for FOFA operations
pub type Result<T> = std::result::Result<T, FofaError>;

/// Errors that can occur when using the FOFA API
#[derive(Error, Debug)]
pub enum FofaError {
    /// Network failure or timeout before a response arrived
    #[error("transport error: {message}")]
    Transport {
        /// Description of the failure
        message: String,
        /// True when the request hit the client timeout
        timeout: bool,
    },

    /// Non-2xx status or a body that is not a JSON envelope
    #[error("protocol error{}: {message}", status_suffix(.status))]
    Protocol {
        /// HTTP status code, if the failure was status-related
        status: Option<u16>,
        /// Error details
        message: String,
    },

    /// `[-700]` email/key pair rejected
    #[error("account invalid: {0}")]
    AccountInvalid(String),

    /// `[-4]` request parameters rejected
    #[error("params error: {0}")]
    ParamsError(String),

    /// `[51]` size outside the accepted range
    #[error("size out of range: {0}")]
    SizeOutOfRange(String),

    /// `[820000]` query could not be parsed by the server
    #[error("query syntax error: {0}")]
    QuerySyntax(String),

    /// `[820001]` account lacks permission for the request
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Error envelope with a code we do not map
    #[error("server error{}: {message}", code_suffix(.code))]
    UnknownServer {
        /// Parsed bracketed code, if any
        code: Option<i64>,
        /// Raw `errmsg` text
        message: String,
    },

    /// `results` had an unexpected shape under a successful envelope
    #[error("malformed results: {0}")]
    MalformedResults(String),

    /// An in-flight page request was dropped before it completed
    #[error("request cancelled before completion")]
    Cancelled,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FofaError {
    /// Build the error for an `error: true` envelope from its `errmsg`.
    ///
    /// The server prefixes messages with a bracketed numeric code such as
    /// `[-700] Account Invalid`. Known codes map to dedicated variants; the
    /// rest keep the raw message.
    #[must_use]
    pub fn from_errmsg(errmsg: &str) -> Self {
        let message = errmsg.to_string();
        match parse_code(errmsg) {
            Some(-700) => Self::AccountInvalid(message),
            Some(-4) => Self::ParamsError(message),
            Some(51) => Self::SizeOutOfRange(message),
            Some(820_000) => Self::QuerySyntax(message),
            Some(820_001) => Self::PermissionDenied(message),
            code => Self::UnknownServer { code, message },
        }
    }

    /// Returns true if a caller may retry the same request
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true if the error came from an `error: true` envelope
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::AccountInvalid(_)
                | Self::ParamsError(_)
                | Self::SizeOutOfRange(_)
                | Self::QuerySyntax(_)
                | Self::PermissionDenied(_)
                | Self::UnknownServer { .. }
        )
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::AccountInvalid(_))
    }

    /// Returns the server's bracketed error code if this is a server error
    #[must_use]
    pub const fn server_code(&self) -> Option<i64> {
        match self {
            Self::AccountInvalid(_) => Some(-700),
            Self::ParamsError(_) => Some(-4),
            Self::SizeOutOfRange(_) => Some(51),
            Self::QuerySyntax(_) => Some(820_000),
            Self::PermissionDenied(_) => Some(820_001),
            Self::UnknownServer { code, .. } => *code,
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" [{c}]")).unwrap_or_default()
}

/// Extract the leading `[<int>]` code from an error message.
fn parse_code(errmsg: &str) -> Option<i64> {
    let rest = errmsg.trim_start().strip_prefix('[')?;
    let end = rest.find(']')?;
    rest[..end].trim().parse().ok()
}

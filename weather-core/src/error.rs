use thiserror::Error;

/// Ways a single weather fetch can fail. The presenter shows all of them the
/// same way; the variants exist for diagnostics.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure before a response arrived (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// The body was not a usable weather report.
    #[error("failed to parse weather response: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

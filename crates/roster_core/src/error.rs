use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    /// The catalog source could not be read or is malformed.
    #[error("Catalog data unavailable: {0}")]
    DataUnavailable(String),

    /// The team request was rejected before assembly.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RosterError {
    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        RosterError::DataUnavailable(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        RosterError::InvalidRequest(msg.into())
    }

    /// Stable error code used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::DataUnavailable(_) => "DATA_UNAVAILABLE",
            RosterError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            RosterError::DataUnavailable(_) => false,
            // The caller can fix the request and retry
            RosterError::InvalidRequest(_) => true,
        }
    }
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        RosterError::DataUnavailable(format!("CSV error: {err}"))
    }
}

impl From<validator::ValidationErrors> for RosterError {
    fn from(err: validator::ValidationErrors) -> Self {
        RosterError::InvalidRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

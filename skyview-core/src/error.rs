use thiserror::Error;

/// Local validation failure; raised before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Please enter a location")]
    EmptyQuery,
}

/// Failure at any step of the geocode → current → forecast sequence.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Failed to send request to OpenWeather ({endpoint})")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// What the user sees. Every fetch failure collapses to `FetchFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorState {
    EmptyQuery,
    FetchFailure,
}

impl ErrorState {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorState::EmptyQuery => "Please enter a location",
            ErrorState::FetchFailure => "Location not found or error fetching data",
        }
    }
}

impl std::fmt::Display for ErrorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<QueryError> for ErrorState {
    fn from(_: QueryError) -> Self {
        ErrorState::EmptyQuery
    }
}

impl From<&FetchError> for ErrorState {
    fn from(_: &FetchError) -> Self {
        ErrorState::FetchFailure
    }
}

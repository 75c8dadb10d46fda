use thiserror::Error;

/// Why a name query was refused before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    Empty,
    DisallowedCharacters,
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInput::Empty => f.write_str("place name is empty"),
            InvalidInput::DisallowedCharacters => {
                f.write_str("place name may only contain letters, spaces and hyphens")
            }
        }
    }
}

/// Terminal outcome of a single lookup. None of these are retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("invalid input: {0}")]
    InvalidInput(InvalidInput),

    #[error("place not found")]
    PlaceNotFound,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("request timed out")]
    Timeout,
}

impl FetchError {
    /// The single message shown to the user for this kind of failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::InvalidInput(InvalidInput::Empty) => "Please enter a city name",
            FetchError::InvalidInput(InvalidInput::DisallowedCharacters) => {
                "Please enter a valid city name"
            }
            FetchError::PlaceNotFound => "City not found. Please try another location.",
            FetchError::MalformedResponse(_) | FetchError::NetworkFailure(_) => {
                "Failed to fetch weather data. Please try again later."
            }
            FetchError::Timeout => {
                "The weather service took too long to respond. Please try again."
            }
        }
    }
}

/// Outcomes a network client can report besides a parsed payload.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("upstream reported the place does not exist")]
    NotFound,

    #[error("upstream request failed with status {0}: {1}")]
    Status(u16, String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected payload: {0}")]
    Malformed(String),
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound => FetchError::PlaceNotFound,
            ClientError::Timeout => FetchError::Timeout,
            ClientError::Malformed(detail) => FetchError::MalformedResponse(detail),
            other @ (ClientError::Status(..) | ClientError::Transport(_)) => {
                FetchError::NetworkFailure(other.to_string())
            }
        }
    }
}

/// Geolocation could not produce coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

impl From<GeolocationError> for FetchError {
    fn from(err: GeolocationError) -> Self {
        FetchError::NetworkFailure(err.to_string())
    }
}

/// Failure reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

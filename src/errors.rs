use reqwest::StatusCode;
use teloxide::{ApiError, RequestError};
use thiserror::Error;

/// Failures talking to the review service
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Endpoint {endpoint} is unreachable: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Endpoint {endpoint} responded with status code {status}")]
    Status { endpoint: String, status: StatusCode },

    #[error("Endpoint {endpoint} returned a body that is not valid JSON: {source}")]
    InvalidBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Structural problems with a review service payload
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("API response is missing the `{0}` key")]
    MissingKey(&'static str),

    #[error("API response has an unexpected shape: {0}")]
    TypeMismatch(String),
}

/// A homework status code outside of the known set
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown homework status: {}", .0.as_deref().unwrap_or("<missing>"))]
pub struct UnknownStatusError(pub Option<String>);

/// Everything that can go wrong in one polling cycle
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatusError),
}

impl PollError {
    /// Text sent to the chat when a cycle fails
    pub fn report(&self) -> String {
        match self {
            PollError::Endpoint(e) => format!("Program failure: review API request failed. {e}"),
            PollError::Schema(e) => format!("Program failure: review API answer is invalid. {e}"),
            PollError::UnknownStatus(e) => {
                format!("Program failure: homework status is not recognized. {e}")
            }
        }
    }
}

/// Failures delivering a chat message
#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("Telegram rejected the message: {0}")]
    Rejected(ApiError),

    #[error("Failed to reach the bot API: {0}")]
    Transport(#[source] RequestError),
}

impl From<RequestError> for SendMessageError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(api) => SendMessageError::Rejected(api),
            other => SendMessageError::Transport(other),
        }
    }
}

/// Errors that prevent the bot from starting at all
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Invalid bot API url {url}: {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

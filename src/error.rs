use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no API key configured")]
    MissingCredential,

    #[error("API key is still the placeholder value")]
    PlaceholderCredential,

    #[error("key rejected ({status}): {message}")]
    Unauthorized { status: StatusCode, message: String },

    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad url: {0}")]
    Url(#[from] url::ParseError),

    #[error("{model} returned no text")]
    EmptyResponse { model: String },
}

impl Error {
    /// Short label used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingCredential | Error::PlaceholderCredential => "config",
            Error::Unauthorized { .. } => "auth",
            Error::Api { .. } => "api",
            Error::Timeout(_) => "timeout",
            Error::Transport(_) => "transport",
            Error::Decode { .. } => "decode",
            Error::Url(_) => "url",
            Error::EmptyResponse { .. } => "empty",
        }
    }

    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized { status, message },
            _ => Error::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err)
        } else {
            Error::Transport(err)
        }
    }
}

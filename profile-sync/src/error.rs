use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: {1}")]
    Context(String, Box<Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Url parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Database inconsistency: {0}")]
    DbError(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

impl Error {
    /// Whether the error was caused by the remote endpoint: transport
    /// failure, bad status or a payload that did not decode.
    pub fn is_network(&self) -> bool {
        match self {
            Error::Network(_) | Error::Status { .. } | Error::SerdeJson(_) => true,
            Error::Context(_, inner) => inner.is_network(),
            _ => false,
        }
    }
}

pub trait Context<T, E> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e.into())))
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}

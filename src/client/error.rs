use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure envelope.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Please log in to checkout")]
    LoginRequired,

    #[error("Your cart is empty")]
    EmptyCart,
}

pub type ClientResult<T> = Result<T, ClientError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersClientError {
    /// The server answered with an `{error, message}` body.
    #[error("{error}")]
    Api { status: u16, error: String },
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error(transparent)]
    RequestError(#[from] gloo_net::Error),
}

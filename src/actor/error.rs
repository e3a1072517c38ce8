use crate::sim::SimError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("engine actor is not running")]
    Closed,
    #[error("engine actor dropped the request")]
    NoResponse,
    #[error(transparent)]
    Sim(#[from] SimError),
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for Error {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Error::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for Error {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Error::NoResponse
    }
}

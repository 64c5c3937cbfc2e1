use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessengerError {
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),
}

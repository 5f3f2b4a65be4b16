use ward_client::ClientError;
use ward_wire::WireError;

/// Why a call to the platform produced no usable answer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The platform answered with `success: false`.
    #[error("platform rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid input: {0}")]
    Validation(#[from] WireError),

    #[error("{operation} {entity} failed: {message}")]
    BatchPartialFailure {
        entity: &'static str,
        operation: &'static str,
        message: String,
    },

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        ServiceError::Transport(TransportError::Client(err))
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

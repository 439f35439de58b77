use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

pub type RelayResult<T> = std::result::Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid event type")]
    UnsupportedEventType(Option<String>),

    #[error("Pipeline '{name}' not found in project {project}")]
    PipelineNotFound { name: String, project: String },

    #[error("Pipeline service request failed ({status:?}): {message}")]
    DispatchTransportFailure {
        status: Option<u16>,
        message: String,
    },

    #[error("Missing configuration value {0}")]
    MissingConfiguration(&'static str),
}

impl RelayError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::DispatchTransportFailure {
            status,
            message: message.into(),
        }
    }

    /// Stable identifier used as the `error_kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "malformed_payload",
            Self::UnsupportedEventType(_) => "unsupported_event_type",
            Self::PipelineNotFound { .. } => "pipeline_not_found",
            Self::DispatchTransportFailure { .. } => "transport_failure",
            Self::MissingConfiguration(_) => "missing_configuration",
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        Self::transport(e.status().map(|s| s.as_u16()), e.to_string())
    }
}

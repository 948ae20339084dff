use thiserror::Error;

/// Everything that can go wrong between pressing a demo button and
/// showing a result. None of these are fatal; each ends up as a toast.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DemoError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("User is not authenticated")]
    Unauthenticated,
    #[error("No credits left")]
    QuotaExceeded,
    #[error("A request is already in progress")]
    Busy,
    #[error("The image changed before the reply arrived")]
    Superseded,
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no image selected")]
    MissingImage,
    #[error("neither an image nor a text query was given")]
    MissingQuery,
    #[error("no label to classify against")]
    NoLabels,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid URL in config: {0}")]
    Url(#[from] url::ParseError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl DemoError {
    /// Text shown to the visitor.
    pub fn user_message(&self) -> String {
        match self {
            DemoError::Validation(ValidationError::MissingImage) => {
                "Please upload an image first.".to_string()
            }
            DemoError::Validation(ValidationError::MissingQuery) => {
                "Please upload an image or describe what you are looking for.".to_string()
            }
            DemoError::Validation(ValidationError::NoLabels) => {
                "Please add at least one label.".to_string()
            }
            DemoError::Unauthenticated => "You need to log in to use this API.".to_string(),
            DemoError::QuotaExceeded => {
                "You have no credits left. Top up your account to keep using the API.".to_string()
            }
            DemoError::Busy => "A request is already in progress.".to_string(),
            DemoError::Superseded => {
                "The image changed before the result arrived. Please run it again.".to_string()
            }
            DemoError::Transport(e) => {
                log::debug!("transport failure surfaced as generic message: {}", e);
                "The API call failed. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_message_is_specific() {
        let msg = DemoError::QuotaExceeded.user_message();
        assert!(msg.contains("credits"));
        assert_ne!(msg, DemoError::Transport(TransportError::Network("x".into())).user_message());
    }

    #[test]
    fn test_transport_messages_are_generic() {
        let a = DemoError::from(TransportError::Status {
            status: 500,
            body: "boom".into(),
        });
        let b = DemoError::from(TransportError::Decode("eof".into()));
        assert_eq!(a.user_message(), b.user_message());
        assert!(!a.user_message().contains("boom"));
    }

    #[test]
    fn test_validation_converts_into_demo_error() {
        let err: DemoError = ValidationError::NoLabels.into();
        assert_eq!(err, DemoError::Validation(ValidationError::NoLabels));
        assert!(err.to_string().contains("label"));
    }
}

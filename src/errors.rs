pub type AuthzResult<T> = Result<T, AuthzError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("invalid permissions level: {0}")]
    UnknownLevel(String),
    #[error("invalid level registry: {0}")]
    InvalidRegistry(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("forbidden: {action}")]
    Forbidden { action: String },
}

impl AuthzError {
    pub fn unknown_level(name: impl Into<String>) -> Self {
        Self::UnknownLevel(name.into())
    }

    pub fn invalid_registry(message: impl Into<String>) -> Self {
        Self::InvalidRegistry(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    /// Short machine-readable kind, e.g. for CLI output or host error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthzError::UnknownLevel(_) => "unknown_level",
            AuthzError::InvalidRegistry(_) => "invalid_registry",
            AuthzError::Configuration(_) => "configuration",
            AuthzError::Forbidden { .. } => "forbidden",
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for AuthzError {
    fn from(value: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = value.path().to_string();
        Self::Configuration(format!("{} at `{}`", value.into_inner(), path))
    }
}

impl From<std::io::Error> for AuthzError {
    fn from(value: std::io::Error) -> Self {
        Self::Configuration(value.to_string())
    }
}

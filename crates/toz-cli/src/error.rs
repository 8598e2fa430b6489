use toz_core::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::Config(_) => 3,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(CliError::invalid("x").exit_code(), 2);
        assert_eq!(
            CliError::Config(ConfigError::Validation(vec!["bad".into()])).exit_code(),
            3
        );
        assert_eq!(CliError::Io(std::io::Error::other("boom")).exit_code(), 1);
    }

    #[test]
    fn validation_message_lists_errors() {
        let error = CliError::Config(ConfigError::Validation(vec![
            "alt.unit_total must be finite".into(),
            "ust.weights must sum to 1.0".into(),
        ]));
        let text = error.to_string();
        assert!(text.contains("alt.unit_total"));
        assert!(text.contains("ust.weights"));
    }
}

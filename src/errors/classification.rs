use super::types::CtemError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Whether the adapter may move on to the next query variant after this error.
    pub falls_through: bool,
}

impl CtemError {
    /// Classify this error to decide whether variant fallback may continue.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Per-variant failures
            CtemError::Transport(_) => ErrorClassification {
                error_type: "TransportError",
                falls_through: true,
            },
            CtemError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                falls_through: true,
            },
            CtemError::Schema(_) => ErrorClassification {
                error_type: "SchemaError",
                falls_through: true,
            },
            CtemError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                falls_through: true,
            },

            // Fatal for the whole call
            CtemError::Auth(_) => ErrorClassification {
                error_type: "AuthError",
                falls_through: false,
            },
            CtemError::AdapterExhausted { .. } => ErrorClassification {
                error_type: "AdapterExhaustedError",
                falls_through: false,
            },
            CtemError::UnknownOperation(_) => ErrorClassification {
                error_type: "UnknownOperationError",
                falls_through: false,
            },
            CtemError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                falls_through: false,
            },
            CtemError::InvalidRequest(_) => ErrorClassification {
                error_type: "InvalidRequestError",
                falls_through: false,
            },
            CtemError::Io(_) => ErrorClassification {
                error_type: "IoError",
                falls_through: false,
            },
            CtemError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                falls_through: false,
            },
            CtemError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                falls_through: false,
            },
        }
    }
}

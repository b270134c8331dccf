use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortMapError {
    #[error("Invalid registry: {message}")]
    InvalidRegistry { message: String },

    #[error("Probe of port {port} failed: {source}")]
    ProbeError {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {target} output to {path}: {source}")]
    WriteError {
        target: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML rendering error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Registry,
    Probe,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PortMapError {
    pub fn invalid_registry(message: impl Into<String>) -> Self {
        Self::InvalidRegistry {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRegistry { .. } => ErrorCategory::Registry,
            Self::ProbeError { .. } => ErrorCategory::Probe,
            Self::WriteError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::YamlError(_)
            | Self::CsvError(_)
            | Self::ZipError(_) => ErrorCategory::Output,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Registry => ErrorSeverity::High,
            ErrorCategory::Probe => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this failure. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidRegistry { .. } => {
                "Check the service table and extra_services for duplicate ports or names".to_string()
            }
            Self::ProbeError { port, .. } => format!(
                "Port {} could not be probed; run with --skip-scan or adjust permissions",
                port
            ),
            Self::WriteError { path, .. } => format!(
                "Make sure '{}' is writable or choose another --output-path",
                path
            ),
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            Self::SerializationError(_) | Self::YamlError(_) | Self::CsvError(_) => {
                "Re-run with --verbose and inspect the offending entry".to_string()
            }
            Self::ZipError(_) => "Disable the bundle output or free disk space".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Review the configuration flags or TOML file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Registry => format!("Port registry is inconsistent: {}", self),
            ErrorCategory::Probe => format!("Port scan aborted: {}", self),
            ErrorCategory::Output => format!("Could not write generated files: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortMapError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid module data in {path}: {message}")]
    DataFileError { path: String, message: String },

    #[error("Duplicate module key '{module}' in {path}")]
    DuplicateModuleError { module: String, path: String },

    #[error("Invalid {field} '{value}': {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown module '{module}'")]
    NotFoundError { module: String },

    #[error("Module '{module}' has no stat '{stat}'")]
    UnknownStatError { module: String, stat: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    NotFound,
    System,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration_error",
            ErrorCategory::Validation => "validation_error",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::System => "system_error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StatsError {
    pub fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        StatsError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(module: &str) -> Self {
        StatsError::NotFoundError {
            module: module.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StatsError::IoError(_)
            | StatsError::SerializationError(_)
            | StatsError::ConfigError { .. }
            | StatsError::MissingConfigError { .. }
            | StatsError::InvalidConfigValueError { .. }
            | StatsError::DataFileError { .. }
            | StatsError::DuplicateModuleError { .. } => ErrorCategory::Configuration,
            StatsError::ValidationError { .. } => ErrorCategory::Validation,
            StatsError::NotFoundError { .. } | StatsError::UnknownStatError { .. } => {
                ErrorCategory::NotFound
            }
            StatsError::ServerError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 啟動階段遇到此類錯誤時必須中止
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::System
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            StatsError::IoError(_) => {
                "Check that the data files exist and are readable".to_string()
            }
            StatsError::SerializationError(_) | StatsError::DataFileError { .. } => {
                "Fix the JSON structure of the module data file".to_string()
            }
            StatsError::ConfigError { .. } => "Review the TOML configuration file".to_string(),
            StatsError::MissingConfigError { field } => {
                format!("Add the '{}' setting to the configuration", field)
            }
            StatsError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            StatsError::DuplicateModuleError { module, .. } => {
                format!("Keep exactly one definition of module '{}'", module)
            }
            StatsError::ValidationError { field, .. } => {
                format!("Send a valid '{}' parameter", field)
            }
            StatsError::NotFoundError { .. } => {
                "List the available modules with GET /modules".to_string()
            }
            StatsError::UnknownStatError { module, .. } => {
                format!("Use one of the stats listed for '{}' in GET /modules", module)
            }
            StatsError::ServerError { .. } => {
                "Check that the listen address is free and permitted".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Failed to load configuration: {}", self),
            ErrorCategory::Validation => format!("Invalid request: {}", self),
            ErrorCategory::NotFound => self.to_string(),
            ErrorCategory::System => format!("Server failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

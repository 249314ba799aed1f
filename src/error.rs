use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DataError: {0}")]
    Data(#[from] DataError),
    #[error("UtilsError: {0}")]
    Utils(#[from] UtilsError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("Controller stopped before the load finished")]
    ControllerClosed,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to create HTTP client: {message}")]
    ClientInit { message: String },
}

/// Classified failure visible to repositories, use cases and controllers.
///
/// This is a closed set: transport and decoding errors are mapped onto one of
/// these members at the data source boundary and never travel further up raw.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataError {
    #[error("{0}")]
    Remote(#[from] RemoteError),
    #[error("{0}")]
    Local(#[from] LocalError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Request timed out")]
    RequestTimeout,
    #[error("Too many requests")]
    TooManyRequests,
    #[error("No internet connection")]
    NoInternet,
    #[error("Server error")]
    Server,
    #[error("Response could not be decoded")]
    Serialization,
    #[error("Unknown remote error")]
    Unknown,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalError {
    #[error("Disk is full")]
    DiskFull,
    #[error("Unknown local error")]
    Unknown,
}

impl DataError {
    /// Whether offering the user a retry makes sense for this failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::Remote(remote) => !matches!(remote, RemoteError::Serialization),
            DataError::Local(LocalError::DiskFull) => false,
            DataError::Local(LocalError::Unknown) => true,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<&'static str> {
        match self {
            DataError::Remote(RemoteError::NoInternet) => {
                Some("Check your internet connection and try again")
            }
            DataError::Remote(RemoteError::RequestTimeout) => {
                Some("The server took too long to answer, try again in a moment")
            }
            DataError::Remote(RemoteError::TooManyRequests) => {
                Some("Rate limit reached, wait a few seconds before retrying")
            }
            DataError::Remote(RemoteError::Server) => {
                Some("The catalog service is having trouble, try again later")
            }
            DataError::Remote(RemoteError::Serialization) => {
                Some("Check that 'api_url' points at a TMDB compatible API")
            }
            DataError::Local(LocalError::DiskFull) => Some("Free some disk space and try again"),
            DataError::Remote(RemoteError::Unknown) | DataError::Local(LocalError::Unknown) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration save failed: {message}")]
    ConfigSaveFailed { message: String },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(_) => ErrorSeverity::Critical,
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Data(data_error) => match data_error {
                DataError::Remote(RemoteError::Server | RemoteError::Serialization) => {
                    ErrorSeverity::High
                }
                DataError::Local(LocalError::DiskFull) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            AppError::Utils(_) => ErrorSeverity::Low,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Data(data_error) => format!("Could not load movies: {}", data_error),
            AppError::Config(ConfigError::ProfileNotFound { name }) => {
                format!("Profile '{}' does not exist", name)
            }
            AppError::Config(ConfigError::InvalidValue { field, reason, .. }) => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Data(data_error) => data_error.troubleshooting_hint().map(str::to_string),
            AppError::Config(ConfigError::ProfileNotFound { .. }) => {
                Some("'movie-catalog config show' lists the configured profiles".to_string())
            }
            AppError::Config(ConfigError::UnknownKey { .. }) => Some(
                "Valid keys: api_url, image_base_url, timeout_seconds, debounce_millis"
                    .to_string(),
            ),
            AppError::Storage(StorageError::ConfigParseError { .. }) => {
                Some("Fix or remove the config file and try again".to_string())
            }
            _ => None,
        }
    }
}

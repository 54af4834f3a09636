use thiserror::Error;

/// Failures of the two-step login handshake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Login page unavailable: {0}")]
    PageUnavailable(String),

    #[error("Anti-forgery token not found on login page")]
    TokenMissing,

    #[error("Login failed: invalid credentials")]
    InvalidCredentials,
}

/// Failures while retrieving the tank page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Tank page unavailable: {0}")]
    Unavailable(String),
}

/// Per-block parse problems. Logged and counted, never fatal to a cycle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseWarning {
    #[error("Tank block {block} has no name, skipped")]
    MissingName { block: usize },

    #[error("Tank '{tank}': unusable percent value '{raw}'")]
    InvalidPercent { tank: String, raw: String },

    #[error("Tank '{tank}': unusable gallons value '{raw}'")]
    InvalidGallons { tank: String, raw: String },
}

/// Outcome of the setup-time credential check, mapped to stable tags.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Invalid MyFuelPortal credentials")]
    InvalidAuth,

    #[error("Cannot connect to MyFuelPortal: {0}")]
    CannotConnect(String),
}

impl SetupError {
    /// Short machine-readable tag for the failure.
    pub fn tag(&self) -> &'static str {
        match self {
            SetupError::InvalidAuth => "invalid_auth",
            SetupError::CannotConnect(_) => "cannot_connect",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scrape cycle failed: {0}")]
    Cycle(String),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;

//! Error types for talent-tui
//!
//! Wraps library errors and terminal/IO errors for unified handling.

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Library error (configuration, identity storage, HTTP client setup)
    #[error("Service error: {0}")]
    Service(#[from] libtalentgrid::TalentError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;

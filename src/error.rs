// src/error.rs

//! Unified error handling for the stock watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Page load did not finish in time
    #[error("Timed out after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mailbox address could not be parsed
    #[error("Invalid email address '{address}': {message}")]
    Address { address: String, message: String },

    /// Email message could not be assembled
    #[error("Email build error: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// SMTP delivery failed
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl AppError {
    /// Create a timeout error for a page load.
    pub fn timeout(url: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            secs,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an address parsing error.
    pub fn address(address: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Address {
            address: address.into(),
            message: message.to_string(),
        }
    }
}

//! Global error handling for promptpack
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::modify::ParseError;

/// Global error type for promptpack operations
#[derive(Error, Debug)]
pub enum PromptPackError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Clipboard-related errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Modification block parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Git-related errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// The working directory is not inside a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    /// The clipboard had no content to apply
    #[error("Clipboard is empty, nothing to apply")]
    EmptyClipboard,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Selection errors
    #[error("Selection error: {0}")]
    Selection(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for promptpack operations
pub type Result<T> = std::result::Result<T, PromptPackError>;

/// Creates a PromptPackError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::PromptPackError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            PromptPackError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

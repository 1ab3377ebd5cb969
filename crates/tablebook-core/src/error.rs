// SPDX-FileCopyrightText: 2026 Tablebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Tablebook.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum TablebookError {
    /// Configuration errors (missing bot token, unknown time zone, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable storage errors (file I/O, CSV encoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging gateway errors (connection failure, rejected send, closed stream).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TablebookError {
    /// Wraps any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Returns `true` when the error means the inbound stream is gone for good.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Gateway { message, .. } if message.contains("closed"))
    }
}

impl From<std::io::Error> for TablebookError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err)
    }
}

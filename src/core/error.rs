//! Error handling for appcast-notify
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`UpdateError`]) for precise handling inside the library
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for the CLI
//!
//! # Error Kinds
//!
//! - [`UpdateError::Transport`] - the feed (or an artifact) could not be fetched
//! - [`UpdateError::FeedFormat`] - the feed document is not well-formed markup
//! - [`UpdateError::Install`] - downloading or launching an accepted update failed
//! - [`UpdateError::Config`] - a configuration or settings file is invalid
//! - [`UpdateError::Io`] - local filesystem failures while reading or writing state
//!
//! "No information" and "up to date" are not errors; they are outcomes reported by
//! [`crate::resolver::Resolution`] and [`crate::session::CheckOutcome`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use appcast_notify::core::{UpdateError, user_friendly_error};
//!
//! let error = UpdateError::transport("https://example.com/appcast.xml", "timed out");
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The error type for feed retrieval, parsing, and update installation.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Network failure or timeout while fetching a URL.
    ///
    /// Raised for the main feed fetch and for artifact downloads. Failures of the
    /// optional release-notes fetch never surface as this error; they are swallowed
    /// by the feed parser.
    #[error("Failed to retrieve {url}: {message}")]
    Transport {
        /// The URL that could not be fetched
        url: String,
        /// Description of the underlying failure
        message: String,
    },

    /// The feed document could not be parsed as markup at all.
    ///
    /// Malformed individual entries inside an otherwise valid feed never produce
    /// this error; they are filtered out silently.
    #[error("Malformed update feed: {message}")]
    FeedFormat {
        /// Parser diagnostic
        message: String,
    },

    /// Downloading or launching the installer for an accepted update failed.
    #[error("Failed to install update: {message}")]
    Install {
        /// Description of the failing step
        message: String,
    },

    /// Configuration or persisted settings are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Local I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UpdateError {
    /// Build a [`UpdateError::Transport`] for `url`.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Build a [`UpdateError::FeedFormat`].
    pub fn feed_format(message: impl fmt::Display) -> Self {
        Self::FeedFormat {
            message: message.to_string(),
        }
    }

    /// Build a [`UpdateError::Install`].
    pub fn install(message: impl fmt::Display) -> Self {
        Self::Install {
            message: message.to_string(),
        }
    }

    /// Build a [`UpdateError::Config`].
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::FeedFormat { .. } => "feed-format",
            Self::Install { .. } => "install",
            Self::Config { .. } => "config",
            Self::Io(_) => "io",
        }
    }
}

/// Convenience alias for library results.
pub type Result<T, E = UpdateError> = std::result::Result<T, E>;

/// An error enriched with optional details and a suggestion for the user.
///
/// The CLI prints these with [`ErrorContext::display`]; library code never
/// constructs them.
#[derive(Debug)]
pub struct ErrorContext {
    /// Headline message
    pub message: String,
    /// Optional additional details about the error
    pub details: Option<String>,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Create a context with only a headline message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`UpdateError`] kinds, [`std::io::Error`] and [`toml::de::Error`]
/// anywhere in the error chain. Anything else is rendered with its full
/// `Caused by` chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(update_error) = cause.downcast_ref::<UpdateError>() {
            return create_error_context(update_error, &error);
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(error_with_chain(&error))
                .with_suggestion("Check the ownership and permissions of the configuration directory");
        }
    }

    if error.chain().any(|cause| cause.downcast_ref::<toml::de::Error>().is_some()) {
        return ErrorContext::new(error_with_chain(&error))
            .with_suggestion("Check the TOML syntax of the file; run 'appcast-notify config path' to locate it")
            .with_details("TOML parsing errors are usually caused by missing quotes or mismatched brackets");
    }

    ErrorContext::new(error_with_chain(&error))
}

fn create_error_context(update_error: &UpdateError, error: &anyhow::Error) -> ErrorContext {
    let message = error_with_chain(error);
    match update_error {
        UpdateError::Transport { url, .. } => ErrorContext::new(message)
            .with_suggestion(format!(
                "Check your internet connection and that {url} is reachable, then try again later"
            ))
            .with_details("Use --timeout to allow slower connections"),
        UpdateError::FeedFormat { .. } => ErrorContext::new(message)
            .with_suggestion("Verify the feed URL points to an RSS appcast document")
            .with_details("The feed must be well-formed XML with <channel> and <item> elements"),
        UpdateError::Install { .. } => ErrorContext::new(message)
            .with_suggestion("Download and install the update manually from the release page"),
        UpdateError::Config { .. } => ErrorContext::new(message)
            .with_suggestion("Run 'appcast-notify config show' to inspect the effective configuration"),
        UpdateError::Io(_) => ErrorContext::new(message),
    }
}

fn error_with_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

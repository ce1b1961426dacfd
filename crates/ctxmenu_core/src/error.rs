//! Error types for ctxmenu.
//!
//! Usage errors (duplicate attachment, unresolved selector, deleting an
//! unknown target) are non-fatal: callers get them back as `Err` and they are
//! also emitted on the diagnostic channel with `tracing::error!`.

use thiserror::Error;

/// Main error type for ctxmenu.
#[derive(Debug, Error)]
pub enum CtxMenuError {
    /// A context menu is already registered for the selector.
    #[error("target element {selector} already has a context menu assigned, use update() instead")]
    AlreadyAttached {
        /// The selector that was passed to `attach`.
        selector: String,
    },

    /// The selector did not resolve to an element.
    #[error("target element {selector} not found")]
    TargetNotFound {
        /// The selector that failed to resolve.
        selector: String,
    },

    /// No context menu is registered for the selector.
    #[error("no context menu for target element {selector} found")]
    NotAttached {
        /// The selector that was passed to `delete`.
        selector: String,
    },

    /// The selector was registered but its element is gone from the document.
    #[error("target element {selector} does not exist (anymore)")]
    TargetRemoved {
        /// The selector whose element disappeared.
        selector: String,
    },

    /// Configuration error.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unexpected internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },
}

impl CtxMenuError {
    // ========== Constructors ==========

    /// Create a duplicate attachment error.
    pub fn already_attached(selector: impl Into<String>) -> Self {
        Self::AlreadyAttached { selector: selector.into() }
    }

    /// Create an unresolved selector error.
    pub fn target_not_found(selector: impl Into<String>) -> Self {
        Self::TargetNotFound { selector: selector.into() }
    }

    /// Create a missing registry entry error.
    pub fn not_attached(selector: impl Into<String>) -> Self {
        Self::NotAttached { selector: selector.into() }
    }

    /// Create a removed target error.
    pub fn target_removed(selector: impl Into<String>) -> Self {
        Self::TargetRemoved { selector: selector.into() }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    // ========== Methods ==========

    /// Check if this error is a caller mistake rather than a failure.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadyAttached { .. }
                | Self::TargetNotFound { .. }
                | Self::NotAttached { .. }
                | Self::TargetRemoved { .. }
        )
    }

    /// The selector involved, for usage errors.
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::AlreadyAttached { selector }
            | Self::TargetNotFound { selector }
            | Self::NotAttached { selector }
            | Self::TargetRemoved { selector } => Some(selector),
            _ => None,
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::AlreadyAttached { .. } | Self::NotAttached { .. } => "Registry",
            Self::TargetNotFound { .. } | Self::TargetRemoved { .. } => "Target",
            Self::Config { .. } => "Config",
            Self::Internal { .. } => "Internal",
        }
    }

    /// Get actionable hint for the caller.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::AlreadyAttached { .. } => Some("Call update() to replace an existing menu"),
            Self::TargetNotFound { .. } => Some("Check the selector and that the element exists"),
            Self::NotAttached { .. } => Some("Call attach() before delete()"),
            Self::TargetRemoved { .. } => None,
            Self::Config { .. } => Some("Check the menu configuration JSON"),
            Self::Internal { .. } => Some("Please report this issue"),
        }
    }

    /// Convert to displayable error info.
    pub fn to_error_info(&self) -> ErrorInfo {
        let technical_detail = match self {
            Self::Config { source: Some(source), .. } => Some(source.to_string()),
            _ => self.selector().map(|s| format!("Selector: {s}")),
        };

        ErrorInfo {
            error_type: format!("{} Error", self.category()),
            message: self.to_string(),
            hint: self.hint().map(String::from),
            technical_detail,
        }
    }
}

/// Displayable error information.
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Category name (e.g., "Target Error").
    pub error_type: String,
    /// Human-readable message.
    pub message: String,
    /// Actionable suggestion.
    pub hint: Option<String>,
    /// Technical detail for diagnostics.
    pub technical_detail: Option<String>,
}

// ========== Error Conversions ==========

/// Convert from serde_json::Error to CtxMenuError.
impl From<serde_json::Error> for CtxMenuError {
    fn from(err: serde_json::Error) -> Self {
        CtxMenuError::Config { message: format!("JSON error: {err}"), source: Some(Box::new(err)) }
    }
}

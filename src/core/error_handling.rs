//! Generic error handling utilities
//!
//! Errors that reach the top of the binary are logged through
//! [`log_error_with_context`], which decides between the error's own message
//! and a generic description of the failed operation.

use crate::core::validation::ValidationError;

/// Errors that can tell user-actionable failures from system failures
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with something the user can fix. Otherwise it returns
/// `None` and the caller falls back to the operation context.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message that should be shown
    /// to the user as-is (bad arguments, invalid configuration, ...)
    fn is_user_actionable(&self) -> bool;

    /// The user-facing message for actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with a detail level matching its kind
///
/// The primary `FATAL:` line uses the user message when there is one and
/// the operation context otherwise. Full detail goes to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use handoff::core::error_handling::log_error_with_context;
/// # use handoff::core::validation::ValidationError;
/// let err = ValidationError::new("Queue capacity must be greater than 0");
/// log_error_with_context(&err, "Configuration loading");
/// // Logs: "FATAL: Queue capacity must be greater than 0"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_line(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

fn fatal_line<'a, E: ContextualError>(error: &'a E, operation_context: &'a str) -> &'a str {
    if error.is_user_actionable() {
        error.user_message().unwrap_or(operation_context)
    } else {
        operation_context
    }
}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(self.message())
    }
}

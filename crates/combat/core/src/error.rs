//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`ActionError`, `TurnError`, `InitializationError`)
//! live next to the code that raises them. This module holds the shared
//! classification every one of them implements.
//!
//! No combat error is fatal to the surrounding process: the worst outcome is
//! ending the current battle early in a fully-defined state.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later or with a
    /// different choice (ability on cooldown, resolution in progress).
    Recoverable,

    /// Invalid input that should not be retried unchanged
    /// (ability not in kit, unknown combatant).
    Validation,

    /// Unexpected inconsistency in supplied data (missing ability definition).
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all combat-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static identifier for this error variant, for logs and tests.
    fn error_code(&self) -> &'static str;
}

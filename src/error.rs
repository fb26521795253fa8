//! Error types for the simulation core.
//!
//! Every error here is local and recoverable. Callers decide whether a
//! failure is user-visible, retried, or fatal.

use thiserror::Error;

use crate::arena::ArenaId;
use crate::session::SessionPhase;

/// Main error type for simulation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Arena id absent from the catalog
    #[error("Arena not found: {id}")]
    NotFound { id: ArenaId },

    /// Non-finite or out-of-domain numeric input
    #[error("Invalid physics input: {field} = {value}")]
    InvalidPhysicsInput { field: &'static str, value: f64 },

    /// Configured range with lo > hi (or non-finite bounds)
    #[error("Invalid range for {field}: [{lo}, {hi}]")]
    InvalidRange {
        field: &'static str,
        lo: f64,
        hi: f64,
    },

    /// Arena definitions that cannot form a catalog
    #[error("Invalid arena catalog: {0}")]
    InvalidCatalog(String),

    /// Session action not allowed in the current phase
    #[error("Cannot {action} while session is {from:?}")]
    InvalidTransition {
        from: SessionPhase,
        action: &'static str,
    },

    /// Arena exists but the player has not earned access
    #[error("Arena {id} is locked")]
    ArenaLocked { id: ArenaId },

    /// Malformed tuning data
    #[error("Tuning error: {0}")]
    Tuning(String),
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new invalid physics input error.
    #[must_use]
    pub fn invalid_input(field: &'static str, value: f64) -> Self {
        Self::InvalidPhysicsInput { field, value }
    }

    /// Creates a new invalid range error.
    #[must_use]
    pub fn invalid_range(field: &'static str, lo: f64, hi: f64) -> Self {
        Self::InvalidRange { field, lo, hi }
    }

    /// Creates a new tuning error.
    #[must_use]
    pub fn tuning<S: Into<String>>(msg: S) -> Self {
        Self::Tuning(msg.into())
    }

    /// True for errors raised by caller-supplied numbers
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidPhysicsInput { .. })
    }
}

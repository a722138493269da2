//! Error types for the permit authorization engine.
//!
//! All fallible operations in the permit crates return `PermitResult<T>`.
//! The variants here are the full taxonomy of evaluation failures — a
//! *denied* authorization is not an error, it is `Ok(false)`. Informational
//! outcomes of idempotent calls ("already defined", "nothing to remove")
//! are likewise returned as values, never raised through this type.

use thiserror::Error;

/// The unified error type for the permit crates.
#[derive(Debug, Error)]
pub enum PermitError {
    /// Malformed input: empty names, negative or non-power-of-two bit
    /// values, or a missing instance/owner key where one is required.
    ///
    /// Always detected before any mutation — a call that fails with this
    /// variant has changed nothing.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The referenced (resource, action) pair is not registered.
    ///
    /// Distinct from a `false` authorization result: callers must treat
    /// this as a configuration error, not as "denied".
    #[error("no action '{action}' is defined for resource '{resource}'")]
    UnknownAction { resource: String, action: String },

    /// A role name could not be resolved to a role id.
    ///
    /// Like `UnknownAction`, this signals a configuration problem rather
    /// than a denial.
    #[error("no role named '{role}' is known to the role directory")]
    UnknownRole { role: String },

    /// A mutating call was made against an immutable registry backing.
    ///
    /// This is a deliberate capability split, not a defect: the catalog
    /// backing is a fixed set of definitions, the in-memory backing is a
    /// live, administrable one.
    #[error("operation '{operation}' is not supported by this backing")]
    UnsupportedOperation { operation: String },

    /// A collaborator store could not be reached or its state is corrupt.
    ///
    /// Propagated unchanged to the caller; the core never retries.
    #[error("collaborator store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}

impl PermitError {
    /// Build an `InvalidArgument` from any displayable reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        PermitError::InvalidArgument { reason: reason.into() }
    }
}

/// Convenience alias used throughout the permit crates.
pub type PermitResult<T> = Result<T, PermitError>;

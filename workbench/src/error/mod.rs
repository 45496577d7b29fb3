//! Error types produced while declaring and invoking builders.

use thiserror::Error;

/// Boxed error reported by a persistence collaborator.
///
/// The engine never inspects or wraps these; they surface verbatim through
/// [`WorkbenchError::Persistence`].
pub type PersistenceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while declaring or invoking builders.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkbenchError {
    /// An identifier did not name any registered type in the global namespace.
    #[error("uninitialized constant {qualified} (resolving '{name}')")]
    UnresolvedName {
        /// Identifier as supplied by the caller.
        name: String,
        /// Fully-qualified name that was looked up.
        qualified: String,
    },

    /// A different type already occupies a class path in the registry.
    #[error("class path '{path}' is already registered to {existing}")]
    DuplicateType {
        /// Fully-qualified path that collided.
        path: String,
        /// Rust type name of the type already registered there.
        existing: &'static str,
    },

    /// An override key has no matching setter on the target type.
    #[error("unknown attribute '{key}' for {class}")]
    UnknownAttribute {
        /// Class path of the target type.
        class: &'static str,
        /// Offending override key.
        key: String,
    },

    /// An override value could not be converted to the attribute's type.
    #[error("invalid value for attribute '{key}' of {class}: {source}")]
    InvalidAttribute {
        /// Class path of the target type.
        class: &'static str,
        /// Override key whose value was rejected.
        key: String,
        /// Conversion failure.
        #[source]
        source: serde_json::Error,
    },

    /// No builder has been declared for the requested entity.
    #[error("no builder declared for '{entity}'")]
    UnknownBuilder {
        /// Entity name that was requested.
        entity: String,
    },

    /// A record was not of the Rust type a typed operation expected.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Rust type name the caller asked for.
        expected: &'static str,
        /// Class path of the record actually produced.
        found: &'static str,
    },

    /// A defaults function asked for an argument its declared arity withholds.
    #[error("defaults function expects {argument} but its arity does not provide it")]
    ArityMismatch {
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// The target type lacks a collaborator capability the operation needs.
    #[error("{class} does not provide the '{capability}' capability")]
    MissingCapability {
        /// Class path of the target type.
        class: &'static str,
        /// Capability that was required.
        capability: &'static str,
    },

    /// A defaults function reported failure.
    #[error("defaults function failed: {0}")]
    Defaults(#[source] PersistenceError),

    /// Failure reported by the persistence collaborator, passed through unchanged.
    #[error(transparent)]
    Persistence(PersistenceError),

    /// Settings could not be gathered from their providers.
    #[error("failed to load workbench settings: {0}")]
    Settings(#[from] Box<figment::Error>),
}

impl WorkbenchError {
    /// Wraps an error returned from a user-supplied defaults function.
    #[must_use]
    pub fn defaults<E>(err: E) -> Self
    where
        E: Into<PersistenceError>,
    {
        Self::Defaults(err.into())
    }

    /// Wraps an error returned from a persistence collaborator.
    #[must_use]
    pub fn persistence<E>(err: E) -> Self
    where
        E: Into<PersistenceError>,
    {
        Self::Persistence(err.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = WorkbenchError> = std::result::Result<T, E>;

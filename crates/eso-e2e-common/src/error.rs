//! Error types for the ESO e2e fixtures
//!
//! Errors carry the resource identity (kind, name, namespace) so a failed
//! fixture points straight at the object that could not be provisioned.

use thiserror::Error;

/// Main error type for fixture operations
#[derive(Debug, Error)]
pub enum Error {
    /// The API server rejected a create call
    #[error("failed to create {kind} '{}': {message}", qualified_name(.namespace, .name))]
    Create {
        /// Resource kind (e.g., "Secret", "SecretStore")
        kind: String,
        /// Resource name
        name: String,
        /// Resource namespace, `None` for cluster-scoped resources
        namespace: Option<String>,
        /// Description of what failed
        message: String,
        /// The server answered 409 Conflict
        already_exists: bool,
    },

    /// Contradictory or incomplete fixture input
    #[error("validation error: {message}")]
    Validation {
        /// Description of what's invalid
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized (if known)
        kind: Option<String>,
    },

    /// Missing or malformed environment configuration
    #[error("configuration error: {message}")]
    Config {
        /// Description of what's missing
        message: String,
    },

    /// Kubernetes client construction error
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },
}

fn qualified_name(namespace: &Option<String>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{ns}/{name}"),
        None => name.to_string(),
    }
}

impl Error {
    /// Build a create error from a kube-rs failure.
    ///
    /// HTTP 409 responses are flagged so callers asserting non-idempotence can
    /// tell a duplicate apart from other failures.
    pub fn create(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<&str>,
        source: kube::Error,
    ) -> Self {
        let already_exists = matches!(&source, kube::Error::Api(ae) if ae.code == 409);
        Self::Create {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.map(str::to_string),
            message: source.to_string(),
            already_exists,
        }
    }

    /// Build a create error reporting a name collision
    pub fn already_exists(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<&str>,
    ) -> Self {
        let name = name.into();
        let kind = kind.into();
        Self::Create {
            message: format!("{kind} \"{name}\" already exists"),
            kind,
            name,
            namespace: namespace.map(str::to_string),
            already_exists: true,
        }
    }

    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// True when a create call failed because the name is already taken
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Error::Create {
                already_exists: true,
                ..
            }
        )
    }

    /// The kind of the resource this error is about, if any
    pub fn kind(&self) -> Option<&str> {
        match self {
            Error::Create { kind, .. } => Some(kind),
            Error::Serialization { kind, .. } => kind.as_deref(),
            _ => None,
        }
    }
}

//! Resource names for the AWS fixtures
//!
//! Namespaced stores use fixed names: two test cases only collide when they
//! share a namespace. Cluster-scoped stores always embed the namespace.

use crate::eso::StoreKind;

/// Label for test entries that read through the referenced IRSA store
pub const WITH_REFERENCED_IRSA: &str = "with referenced IRSA";
/// Label for test entries that read through the mounted IRSA store
pub const WITH_MOUNTED_IRSA: &str = "with mounted IRSA";

/// Credential Secret for the static store
pub const STATIC_CREDENTIALS_SECRET_NAME: &str = "provider-secret";
/// Credential Secret for the referent store, created in the consuming namespace
pub const STATIC_REFERENT_CREDENTIALS_SECRET_NAME: &str = "referent-provider-secret";
/// Credential Secret for the external-id store
pub const EXTERNAL_ID_CREDENTIALS_SECRET_NAME: &str = "provider-secret-ext-id";
/// Credential Secret for the session-tags store
pub const SESSION_TAGS_CREDENTIALS_SECRET_NAME: &str = "provider-secret-sess-tags";

/// Static credentials store
pub const STATIC_STORE_NAME: &str = "aws-static-creds";
/// Assumed role with external id store
pub const EXTERNAL_ID_STORE_NAME: &str = "aws-ext-id";
/// Assumed role with session tags store
pub const SESSION_TAGS_STORE_NAME: &str = "aws-sess-tags";

pub use eso_e2e_common::config::{
    DEFAULT_EXTERNAL_ID as IAM_TRUSTED_EXTERNAL_ID,
    DEFAULT_ROLE_EXTERNAL_ID as IAM_ROLE_EXTERNAL_ID,
    DEFAULT_ROLE_SESSION_TAGS as IAM_ROLE_SESSION_TAGS,
};

/// ClusterSecretStore that exchanges a referenced service-account token
pub fn referenced_irsa_store_name(namespace: &str) -> String {
    format!("irsa-ref-{namespace}")
}

/// SecretStore that uses the controller's mounted identity
pub fn mounted_irsa_store_name(namespace: &str) -> String {
    format!("irsa-mounted-{namespace}")
}

/// ClusterSecretStore with referent authentication.
///
/// The prefix is joined to the namespace without a separator.
pub fn referent_store_name(namespace: &str) -> String {
    format!("referent-auth{namespace}")
}

/// Whether a store lives in a namespace or at cluster scope
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreScope {
    /// `SecretStore`
    Namespaced,
    /// `ClusterSecretStore`
    Cluster,
}

impl StoreScope {
    /// Kind used in a `secretStoreRef` for this scope
    pub fn kind(&self) -> StoreKind {
        match self {
            StoreScope::Namespaced => StoreKind::SecretStore,
            StoreScope::Cluster => StoreKind::ClusterSecretStore,
        }
    }
}

/// The four credential-backed store identities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreVariant {
    /// Static keys, no role
    Static,
    /// Assumed role confirmed with an external id
    ExternalId,
    /// Assumed role with session tags
    SessionTags,
    /// Static keys resolved in the consuming namespace
    ReferentStatic,
}

impl StoreVariant {
    /// All variants, in setup order
    pub const ALL: [StoreVariant; 4] = [
        StoreVariant::Static,
        StoreVariant::ExternalId,
        StoreVariant::SessionTags,
        StoreVariant::ReferentStatic,
    ];

    /// Store name for a fixture running in `namespace`
    pub fn store_name(&self, namespace: &str) -> String {
        match self {
            StoreVariant::Static => STATIC_STORE_NAME.to_string(),
            StoreVariant::ExternalId => EXTERNAL_ID_STORE_NAME.to_string(),
            StoreVariant::SessionTags => SESSION_TAGS_STORE_NAME.to_string(),
            StoreVariant::ReferentStatic => referent_store_name(namespace),
        }
    }

    /// Name of the credential Secret the store reads
    pub fn credentials_secret_name(&self) -> &'static str {
        match self {
            StoreVariant::Static => STATIC_CREDENTIALS_SECRET_NAME,
            StoreVariant::ExternalId => EXTERNAL_ID_CREDENTIALS_SECRET_NAME,
            StoreVariant::SessionTags => SESSION_TAGS_CREDENTIALS_SECRET_NAME,
            StoreVariant::ReferentStatic => STATIC_REFERENT_CREDENTIALS_SECRET_NAME,
        }
    }

    /// Scope of the store resource
    pub fn scope(&self) -> StoreScope {
        match self {
            StoreVariant::ReferentStatic => StoreScope::Cluster,
            _ => StoreScope::Namespaced,
        }
    }
}

impl std::fmt::Display for StoreVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreVariant::Static => "static",
            StoreVariant::ExternalId => "external-id",
            StoreVariant::SessionTags => "session-tags",
            StoreVariant::ReferentStatic => "referent-static",
        };
        f.write_str(name)
    }
}

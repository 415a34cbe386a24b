//! External Secrets Operator (ESO) types
//!
//! Typed structs for the ESO resources the fixtures create: `SecretStore`,
//! `ClusterSecretStore` and `ExternalSecret`, with the AWS provider block.
//! These implement `HasApiResource` for consistent API version handling.

use serde::{Deserialize, Serialize};

use eso_e2e_common::kube_utils::{ClusterObjectMeta, HasApiResource, ObjectMeta};

/// ESO API version for every resource in this module
pub const ESO_API_VERSION: &str = "external-secrets.io/v1";

// =============================================================================
// Store kinds
// =============================================================================

/// Kind of store an `ExternalSecret` points at
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Namespaced `SecretStore`
    #[default]
    SecretStore,
    /// Cluster-scoped `ClusterSecretStore`
    ClusterSecretStore,
}

impl StoreKind {
    /// Kind string as the API server knows it
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::SecretStore => SecretStore::KIND,
            StoreKind::ClusterSecretStore => ClusterSecretStore::KIND,
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SecretStore / ClusterSecretStore
// =============================================================================

/// ESO SecretStore resource (namespaced)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecretStore {
    /// API version
    #[serde(default = "SecretStore::default_api_version")]
    pub api_version: String,
    /// Resource kind
    #[serde(default = "SecretStore::default_kind")]
    pub kind: String,
    /// Resource metadata
    pub metadata: ObjectMeta,
    /// Store specification
    pub spec: SecretStoreSpec,
}

impl HasApiResource for SecretStore {
    const API_VERSION: &'static str = ESO_API_VERSION;
    const KIND: &'static str = "SecretStore";
}

impl SecretStore {
    fn default_api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn default_kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new SecretStore
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        spec: SecretStoreSpec,
    ) -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ObjectMeta::new(name, namespace),
            spec,
        }
    }
}

/// ESO ClusterSecretStore resource
///
/// A cluster-scoped store that ExternalSecrets in any namespace can reference.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSecretStore {
    /// API version
    #[serde(default = "ClusterSecretStore::default_api_version")]
    pub api_version: String,
    /// Resource kind
    #[serde(default = "ClusterSecretStore::default_kind")]
    pub kind: String,
    /// Resource metadata
    pub metadata: ClusterObjectMeta,
    /// Store specification
    pub spec: SecretStoreSpec,
}

impl HasApiResource for ClusterSecretStore {
    const API_VERSION: &'static str = ESO_API_VERSION;
    const KIND: &'static str = "ClusterSecretStore";
}

impl ClusterSecretStore {
    fn default_api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn default_kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new ClusterSecretStore
    pub fn new(name: impl Into<String>, spec: SecretStoreSpec) -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ClusterObjectMeta::new(name),
            spec,
        }
    }
}

/// Spec shared by SecretStore and ClusterSecretStore
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SecretStoreSpec {
    /// Provider configuration
    pub provider: ProviderSpec,
}

/// Provider specification
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderSpec {
    /// AWS provider configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsProvider>,
}

// =============================================================================
// AWS provider
// =============================================================================

/// AWS service backing the store
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AwsServiceType {
    /// AWS Secrets Manager
    #[default]
    SecretsManager,
    /// AWS Systems Manager Parameter Store
    ParameterStore,
}

impl AwsServiceType {
    /// Parse a service name (`secretsmanager`, `parameterstore`, case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "secretsmanager" | "secrets-manager" => Some(AwsServiceType::SecretsManager),
            "parameterstore" | "parameter-store" => Some(AwsServiceType::ParameterStore),
            _ => None,
        }
    }
}

/// One session tag attached to an assumed-role session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Tag key
    pub key: String,
    /// Tag value
    pub value: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// AWS provider block (`spec.provider.aws`)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AwsProvider {
    /// Service type
    pub service: AwsServiceType,
    /// AWS region
    pub region: String,
    /// Role to assume, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// External id presented when assuming `role`
    #[serde(
        default,
        rename = "externalID",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_id: Option<String>,
    /// Session tags attached when assuming `role`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_tags: Option<Vec<Tag>>,
    /// How the provider authenticates
    #[serde(default)]
    pub auth: AwsAuth,
}

/// AWS authentication block. Both fields empty means "use the controller's
/// own identity".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AwsAuth {
    /// Static credentials read from a Secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<AwsAuthSecretRef>,
    /// Service-account token exchanged for role credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<AwsJwtAuth>,
}

/// References to the three static credential fields
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AwsAuthSecretRef {
    /// Access key id selector
    #[serde(rename = "accessKeyIDSecretRef")]
    pub access_key_id: SecretKeySelector,
    /// Secret access key selector
    #[serde(rename = "secretAccessKeySecretRef")]
    pub secret_access_key: SecretKeySelector,
    /// Session token selector
    #[serde(
        default,
        rename = "sessionTokenSecretRef",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_token: Option<SecretKeySelector>,
}

/// Selects one key of a Secret by name.
///
/// Without a namespace, a ClusterSecretStore resolves the Secret in the
/// namespace of the consuming ExternalSecret.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SecretKeySelector {
    /// Secret name
    pub name: String,
    /// Secret namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Key within the Secret
    pub key: String,
}

impl SecretKeySelector {
    /// Select `key` from the Secret `name`
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            key: key.into(),
        }
    }
}

/// Service-account token authentication
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AwsJwtAuth {
    /// Service account whose token is exchanged
    pub service_account_ref: ServiceAccountSelector,
}

/// Reference to a ServiceAccount
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceAccountSelector {
    /// ServiceAccount name
    pub name: String,
    /// ServiceAccount namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

// =============================================================================
// ExternalSecret
// =============================================================================

/// ESO ExternalSecret resource
///
/// A namespace-scoped resource that syncs secrets from an external provider
/// into a Kubernetes Secret.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecret {
    /// API version
    #[serde(default = "ExternalSecret::default_api_version")]
    pub api_version: String,
    /// Resource kind
    #[serde(default = "ExternalSecret::default_kind")]
    pub kind: String,
    /// Resource metadata
    pub metadata: ObjectMeta,
    /// ExternalSecret specification
    pub spec: ExternalSecretSpec,
}

impl HasApiResource for ExternalSecret {
    const API_VERSION: &'static str = ESO_API_VERSION;
    const KIND: &'static str = "ExternalSecret";
}

impl ExternalSecret {
    fn default_api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn default_kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new ExternalSecret
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        spec: ExternalSecretSpec,
    ) -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ObjectMeta::new(name, namespace),
            spec,
        }
    }
}

/// ExternalSecret spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretSpec {
    /// Reference to the secret store
    pub secret_store_ref: SecretStoreRef,
    /// Target Kubernetes Secret configuration
    pub target: ExternalSecretTarget,
    /// Key mappings from external secret to K8s secret
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<ExternalSecretData>,
    /// Refresh interval for syncing (e.g., "1h", "10s")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<String>,
}

/// Reference to a SecretStore or ClusterSecretStore
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretStoreRef {
    /// Name of the store
    pub name: String,
    /// Kind of the store
    #[serde(default)]
    pub kind: StoreKind,
}

impl SecretStoreRef {
    /// Reference a namespaced SecretStore
    pub fn secret_store(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StoreKind::SecretStore,
        }
    }

    /// Reference a ClusterSecretStore
    pub fn cluster_secret_store(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StoreKind::ClusterSecretStore,
        }
    }
}

/// Target Kubernetes Secret configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretTarget {
    /// Name of the Kubernetes Secret to create
    pub name: String,
}

impl ExternalSecretTarget {
    /// Create a new target with just the name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Individual key mapping from external secret to K8s secret
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretData {
    /// Key in the resulting Kubernetes Secret
    pub secret_key: String,
    /// Reference to the external secret
    pub remote_ref: RemoteRef,
}

impl ExternalSecretData {
    /// Create a new data mapping
    pub fn new(secret_key: impl Into<String>, remote_ref: RemoteRef) -> Self {
        Self {
            secret_key: secret_key.into(),
            remote_ref,
        }
    }
}

/// Reference to a key in the external secret store
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRef {
    /// Secret name or parameter path in AWS
    pub key: String,
    /// JSON property within the secret (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl RemoteRef {
    /// Reference a whole remote secret
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            property: None,
        }
    }

    /// Reference a specific property within a secret
    pub fn with_property(key: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            property: Some(property.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

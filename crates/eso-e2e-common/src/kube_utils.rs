//! Shared Kubernetes utilities using kube-rs
//!
//! Typed resources that are not part of `k8s-openapi` (the ESO CRDs) are
//! serialized through `DynamicObject`. `HasApiResource` keeps the apiVersion
//! and kind used for serialization identical to the one used for API calls.

use std::collections::BTreeMap;

use kube::api::DynamicObject;
use kube::discovery::ApiResource;
use serde::Serialize;

use crate::{Error, Result};

// =============================================================================
// ObjectMeta - metadata for namespaced fixture resources
// =============================================================================

/// Kubernetes metadata for namespaced fixture resources.
///
/// Adds the fixture management labels on construction so everything the
/// fixtures create can be found with a single label selector.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Create new metadata with standard fixture labels
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            labels: fixture_labels(&name),
            name,
            namespace: namespace.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Metadata for cluster-scoped fixture resources (no namespace)
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ClusterObjectMeta {
    /// Resource name
    pub name: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ClusterObjectMeta {
    /// Create new metadata with standard fixture labels
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            labels: fixture_labels(&name),
            name,
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Standard labels attached to every fixture resource
pub fn fixture_labels(name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(crate::LABEL_NAME.to_string(), name.to_string());
    labels.insert(
        crate::LABEL_MANAGED_BY.to_string(),
        crate::LABEL_MANAGED_BY_E2E.to_string(),
    );
    labels
}

// =============================================================================
// HasApiResource Trait
// =============================================================================

/// Trait for types that have a known API group, version, and kind.
///
/// # Example
/// ```ignore
/// impl HasApiResource for SecretStore {
///     const API_VERSION: &'static str = "external-secrets.io/v1";
///     const KIND: &'static str = "SecretStore";
/// }
///
/// let ar = SecretStore::api_resource();
/// ```
pub trait HasApiResource {
    /// Full API version (e.g., "external-secrets.io/v1", "v1")
    const API_VERSION: &'static str;
    /// Resource kind (e.g., "ClusterSecretStore")
    const KIND: &'static str;

    /// Build an ApiResource from the type's constants.
    fn api_resource() -> ApiResource {
        build_api_resource(Self::API_VERSION, Self::KIND)
    }
}

/// Build an ApiResource from a known apiVersion and kind.
pub fn build_api_resource(api_version: &str, kind: &str) -> ApiResource {
    let (group, version) = parse_api_version(api_version);
    ApiResource {
        group,
        version,
        kind: kind.to_string(),
        api_version: api_version.to_string(),
        plural: pluralize_kind(kind),
    }
}

/// Split an apiVersion into (group, version). Core resources have an empty group.
pub fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

/// Pluralize a kind the way the API server names its resource paths
pub fn pluralize_kind(kind: &str) -> String {
    let lower = kind.to_lowercase();

    if lower.ends_with('s') || lower.ends_with("ch") || lower.ends_with("sh") {
        format!("{}es", lower)
    } else if lower.ends_with('y') && !lower.ends_with("ay") && !lower.ends_with("ey") {
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{}s", lower)
    }
}

/// Convert a typed resource into a `DynamicObject` for `Api<DynamicObject>` calls
pub fn to_dynamic_object<T>(resource: &T) -> Result<DynamicObject>
where
    T: Serialize + HasApiResource,
{
    let value = serde_json::to_value(resource).map_err(|e| {
        Error::serialization_for_kind(T::KIND, format!("failed to serialize {}: {e}", T::KIND))
    })?;
    serde_json::from_value(value).map_err(|e| {
        Error::serialization_for_kind(T::KIND, format!("failed to build {}: {e}", T::KIND))
    })
}

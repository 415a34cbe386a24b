//! Create-only access to the Kubernetes API server
//!
//! The fixtures only ever create resources. `ControlPlane` is the seam that
//! lets the orchestration be tested without a cluster; `KubeControlPlane` is
//! the kube-rs implementation used against a real one.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Api, DynamicObject, PostParams};
use kube::Client;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use tracing::debug;

use eso_e2e_common::kube_utils::{to_dynamic_object, HasApiResource};
use eso_e2e_common::{Error, Result};

use crate::eso::{ClusterSecretStore, ExternalSecret, SecretStore};

/// Trait abstracting the create calls issued by the fixtures
///
/// Every method performs exactly one create. Existing objects are never
/// updated: a taken name is an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Create a core/v1 Secret in its metadata namespace
    async fn create_secret(&self, secret: &Secret) -> Result<()>;

    /// Create a namespaced ESO SecretStore
    async fn create_secret_store(&self, store: &SecretStore) -> Result<()>;

    /// Create a cluster-scoped ESO ClusterSecretStore
    async fn create_cluster_secret_store(&self, store: &ClusterSecretStore) -> Result<()>;

    /// Create an ESO ExternalSecret
    async fn create_external_secret(&self, external_secret: &ExternalSecret)
        -> Result<()>;
}

/// `ControlPlane` backed by a kube-rs client
#[derive(Clone)]
pub struct KubeControlPlane {
    client: Client,
}

impl KubeControlPlane {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn create_dynamic<T>(
        &self,
        resource: &T,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<()>
    where
        T: Serialize + HasApiResource + Sync,
    {
        let obj = to_dynamic_object(resource)?;
        let api_resource = T::api_resource();
        let api: Api<DynamicObject> = match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &api_resource),
            None => Api::all_with(self.client.clone(), &api_resource),
        };

        debug!(kind = T::KIND, name = %name, namespace = ?namespace, "Creating resource");
        api.create(&PostParams::default(), &obj)
            .await
            .map_err(|e| Error::create(T::KIND, name, namespace, e))?;
        Ok(())
    }
}

#[async_trait]
impl ControlPlane for KubeControlPlane {
    async fn create_secret(&self, secret: &Secret) -> Result<()> {
        let name = secret.metadata.name.as_deref().unwrap_or_default();
        let namespace = secret
            .metadata
            .namespace
            .as_deref()
            .ok_or_else(|| Error::validation(format!("Secret '{name}' has no namespace")))?;

        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        debug!(kind = "Secret", name = %name, namespace = %namespace, "Creating resource");
        api.create(&PostParams::default(), secret)
            .await
            .map_err(|e| Error::create("Secret", name, Some(namespace), e))?;
        Ok(())
    }

    async fn create_secret_store(&self, store: &SecretStore) -> Result<()> {
        self.create_dynamic(
            store,
            Some(&store.metadata.namespace),
            &store.metadata.name,
        )
        .await
    }

    async fn create_cluster_secret_store(&self, store: &ClusterSecretStore) -> Result<()> {
        self.create_dynamic(store, None, &store.metadata.name).await
    }

    async fn create_external_secret(
        &self,
        external_secret: &ExternalSecret,
    ) -> Result<()> {
        self.create_dynamic(
            external_secret,
            Some(&external_secret.metadata.namespace),
            &external_secret.metadata.name,
        )
        .await
    }
}

//! Test helpers for integration tests
//!
//! Loads configuration, connects to the cluster and manages the throwaway
//! namespace each story runs in.

use std::time::{SystemTime, UNIX_EPOCH};

use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, DynamicObject, PostParams};
use kube::Client;

use eso_e2e_aws::eso::AwsServiceType;
use eso_e2e_aws::{Framework, KubeControlPlane};
use eso_e2e_common::config::E2eConfig;
use eso_e2e_common::kube_utils::HasApiResource;
use eso_e2e_common::telemetry::init_logging;
use eso_e2e_common::{LABEL_MANAGED_BY, LABEL_MANAGED_BY_E2E};

/// A connected fixture framework plus the configuration it was built from
pub struct TestEnv {
    pub config: E2eConfig,
    pub framework: Framework<KubeControlPlane>,
}

impl TestEnv {
    pub fn client(&self) -> &Client {
        self.framework.client.client()
    }

    pub fn service(&self) -> AwsServiceType {
        AwsServiceType::from_name(&self.config.service)
            .expect("service name validated by E2eConfig")
    }

    /// Delete the namespace; everything the fixtures created in it goes too
    pub async fn teardown(self) {
        let api: Api<Namespace> = Api::all(self.client().clone());
        let _ = api
            .delete(&self.framework.namespace, &DeleteParams::default())
            .await;
    }
}

/// Namespace name unique to this run
fn unique_namespace(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("{prefix}-{:x}-{:x}", std::process::id(), nanos)
}

/// Connect to the cluster and create a fresh namespace for one story
pub async fn setup_test_env(prefix: &str) -> TestEnv {
    let config = E2eConfig::from_env().expect("e2e configuration from environment");
    init_logging(config.log_format);

    let client = config.create_client().await.expect("kube client");
    let namespace = unique_namespace(prefix);

    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.clone()),
            labels: Some(
                [(LABEL_MANAGED_BY.to_string(), LABEL_MANAGED_BY_E2E.to_string())]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        },
        ..Default::default()
    };
    let api: Api<Namespace> = Api::all(client.clone());
    api.create(&PostParams::default(), &ns)
        .await
        .expect("create test namespace");

    TestEnv {
        config,
        framework: Framework::new(namespace, KubeControlPlane::new(client)),
    }
}

/// Fetch a fixture object back from the API server
pub async fn try_get_dynamic<T: HasApiResource>(
    client: &Client,
    namespace: Option<&str>,
    name: &str,
) -> Result<DynamicObject, kube::Error> {
    let ar = T::api_resource();
    let api: Api<DynamicObject> = match namespace {
        Some(ns) => Api::namespaced_with(client.clone(), ns, &ar),
        None => Api::all_with(client.clone(), &ar),
    };
    api.get(name).await
}

/// Fetch a fixture object that must exist
pub async fn get_dynamic<T: HasApiResource>(
    client: &Client,
    namespace: Option<&str>,
    name: &str,
) -> DynamicObject {
    try_get_dynamic::<T>(client, namespace, name)
        .await
        .expect("fixture object exists")
}

/// Remove a cluster-scoped store; namespace teardown does not reach it
pub async fn delete_cluster_store<T: HasApiResource>(client: &Client, name: &str) {
    let api: Api<DynamicObject> = Api::all_with(client.clone(), &T::api_resource());
    let _ = api.delete(name, &DeleteParams::default()).await;
}

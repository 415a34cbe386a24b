//! End-to-end fixtures for the External Secrets Operator AWS provider
//!
//! Each fixture writes AWS credentials into a Secret in the test namespace,
//! then registers a SecretStore or ClusterSecretStore that reads them. The
//! four credential-backed variants cover static keys, an assumed role with
//! an external id, an assumed role with session tags, and referent
//! authentication. Two IRSA stores cover token based identities.

#![deny(missing_docs)]

pub mod client;
pub mod credentials;
pub mod eso;
pub mod fixture;
pub mod naming;
pub mod provider;
pub mod store;

pub use client::{ControlPlane, KubeControlPlane};
pub use credentials::{create_credentials, AccessOpts};
pub use fixture::{
    create_referent_static_store, mounted_irsa_store_ref, referenced_irsa_store_ref,
    setup_external_id_store, setup_mounted_irsa_store, setup_referenced_irsa_store,
    setup_session_tags_store, setup_static_store, use_cluster_secret_store,
    use_mounted_irsa_store, Framework, TestCase,
};
pub use naming::StoreVariant;
pub use provider::{new_static_store_provider, AuthStrategy};
pub use store::{register_store, Store};

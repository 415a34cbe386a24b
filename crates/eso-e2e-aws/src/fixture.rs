//! Fixture entry points
//!
//! Each setup function creates its credential Secret, waits for that call
//! to finish, then creates the store that names it. Nothing is retried and
//! nothing is cleaned up on failure: the namespace teardown owns deletion.

use tracing::{info, instrument};

use eso_e2e_common::{Error, Result};

use crate::client::ControlPlane;
use crate::credentials::{create_credentials, AccessOpts};
use crate::eso::{AwsServiceType, ExternalSecret, SecretStoreRef, Tag};
use crate::naming::{mounted_irsa_store_name, referenced_irsa_store_name, StoreVariant};
use crate::provider::AuthStrategy;
use crate::store::{
    build_mounted_irsa_store, build_referenced_irsa_store, register_store, Store,
};

/// A test namespace and the client used to populate it
pub struct Framework<C> {
    /// Namespace allocated to the running test case
    pub namespace: String,
    /// Control plane client
    pub client: C,
}

impl<C: ControlPlane> Framework<C> {
    /// Create a framework for `namespace`
    pub fn new(namespace: impl Into<String>, client: C) -> Self {
        Self {
            namespace: namespace.into(),
            client,
        }
    }

    async fn provision(
        &self,
        variant: StoreVariant,
        access: &AccessOpts,
        service: AwsServiceType,
        strategy: AuthStrategy,
    ) -> Result<Store> {
        // The credential Secret always lives in the test namespace. For the
        // referent store that is the consuming namespace.
        create_credentials(
            &self.client,
            access,
            variant.credentials_secret_name(),
            &self.namespace,
        )
        .await?;

        register_store(
            &self.client,
            variant,
            &self.namespace,
            service,
            &access.region,
            &strategy,
        )
        .await
    }
}

/// Namespaced store reading static credentials from a Secret
#[instrument(skip(f, access), fields(namespace = %f.namespace))]
pub async fn setup_static_store<C: ControlPlane>(
    f: &Framework<C>,
    access: &AccessOpts,
    service: AwsServiceType,
) -> Result<Store> {
    f.provision(StoreVariant::Static, access, service, AuthStrategy::Static)
        .await
}

/// Namespaced store assuming `access.role`, confirmed with `external_id`
#[instrument(skip(f, access), fields(namespace = %f.namespace))]
pub async fn setup_external_id_store<C: ControlPlane>(
    f: &Framework<C>,
    access: &AccessOpts,
    external_id: &str,
    service: AwsServiceType,
) -> Result<Store> {
    let strategy = AuthStrategy::external_id(&access.role, external_id)?;
    f.provision(StoreVariant::ExternalId, access, service, strategy)
        .await
}

/// Namespaced store assuming `access.role` with `session_tags`
#[instrument(skip(f, access, session_tags), fields(namespace = %f.namespace))]
pub async fn setup_session_tags_store<C: ControlPlane>(
    f: &Framework<C>,
    access: &AccessOpts,
    session_tags: Vec<Tag>,
    service: AwsServiceType,
) -> Result<Store> {
    let strategy = AuthStrategy::session_tags(&access.role, session_tags)?;
    f.provision(StoreVariant::SessionTags, access, service, strategy)
        .await
}

/// ClusterSecretStore with referent authentication.
///
/// The credential Secret is created in the test namespace, which is where
/// the consuming ExternalSecret lives.
#[instrument(skip(f, access), fields(namespace = %f.namespace))]
pub async fn create_referent_static_store<C: ControlPlane>(
    f: &Framework<C>,
    access: &AccessOpts,
    service: AwsServiceType,
) -> Result<Store> {
    f.provision(
        StoreVariant::ReferentStatic,
        access,
        service,
        AuthStrategy::Static,
    )
    .await
}

/// ClusterSecretStore exchanging the token of `service_account` in the test
/// namespace
#[instrument(skip(f), fields(namespace = %f.namespace))]
pub async fn setup_referenced_irsa_store<C: ControlPlane>(
    f: &Framework<C>,
    service: AwsServiceType,
    region: &str,
    service_account: &str,
) -> Result<Store> {
    let css = build_referenced_irsa_store(&f.namespace, service, region, service_account);
    f.client.create_cluster_secret_store(&css).await?;
    info!(store = %css.metadata.name, "Created referenced IRSA store");
    Ok(Store::Cluster(css))
}

/// SecretStore relying on the controller's mounted identity
#[instrument(skip(f), fields(namespace = %f.namespace))]
pub async fn setup_mounted_irsa_store<C: ControlPlane>(
    f: &Framework<C>,
    service: AwsServiceType,
    region: &str,
) -> Result<Store> {
    let store = build_mounted_irsa_store(&f.namespace, service, region);
    f.client.create_secret_store(&store).await?;
    info!(store = %store.metadata.name, "Created mounted IRSA store");
    Ok(Store::Namespaced(store))
}

// =============================================================================
// Store reference selection
// =============================================================================

/// Reference to the referenced IRSA ClusterSecretStore for `namespace`
pub fn referenced_irsa_store_ref(namespace: &str) -> SecretStoreRef {
    SecretStoreRef::cluster_secret_store(referenced_irsa_store_name(namespace))
}

/// Reference to the mounted IRSA SecretStore for `namespace`
pub fn mounted_irsa_store_ref(namespace: &str) -> SecretStoreRef {
    SecretStoreRef::secret_store(mounted_irsa_store_name(namespace))
}

/// A pending ExternalSecret whose store reference may still be changed
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    /// The ExternalSecret to submit
    pub external_secret: ExternalSecret,
    submitted: bool,
}

impl TestCase {
    /// Wrap an ExternalSecret that has not been submitted yet
    pub fn new(external_secret: ExternalSecret) -> Self {
        Self {
            external_secret,
            submitted: false,
        }
    }

    /// Namespace of the ExternalSecret
    pub fn namespace(&self) -> &str {
        &self.external_secret.metadata.namespace
    }

    /// Whether `submit` has succeeded
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Point the ExternalSecret at `store_ref`. Refused after submission.
    pub fn set_store_ref(&mut self, store_ref: SecretStoreRef) -> Result<()> {
        if self.submitted {
            return Err(Error::validation(format!(
                "ExternalSecret '{}' already submitted; store reference can no longer change",
                self.external_secret.metadata.name
            )));
        }
        self.external_secret.spec.secret_store_ref = store_ref;
        Ok(())
    }

    /// Create the ExternalSecret
    pub async fn submit<C: ControlPlane + ?Sized>(&mut self, client: &C) -> Result<()> {
        if self.submitted {
            return Err(Error::validation(format!(
                "ExternalSecret '{}' already submitted",
                self.external_secret.metadata.name
            )));
        }
        client.create_external_secret(&self.external_secret).await?;
        self.submitted = true;
        info!(
            external_secret = %self.external_secret.metadata.name,
            namespace = %self.namespace(),
            store = %self.external_secret.spec.secret_store_ref.name,
            "Submitted ExternalSecret"
        );
        Ok(())
    }
}

/// Select the referenced IRSA ClusterSecretStore for a pending test case
pub fn use_cluster_secret_store(tc: &mut TestCase) -> Result<()> {
    let store_ref = referenced_irsa_store_ref(tc.namespace());
    tc.set_store_ref(store_ref)
}

/// Select the mounted IRSA SecretStore for a pending test case
pub fn use_mounted_irsa_store(tc: &mut TestCase) -> Result<()> {
    let store_ref = mounted_irsa_store_ref(tc.namespace());
    tc.set_store_ref(store_ref)
}

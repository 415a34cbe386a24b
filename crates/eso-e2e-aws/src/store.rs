//! Store registration
//!
//! Builds and creates the SecretStore/ClusterSecretStore for each fixture
//! variant. A store only names its credential Secret; the Secret must be
//! created first or the provider fails on first use.

use tracing::info;

use eso_e2e_common::Result;

use crate::client::ControlPlane;
use crate::eso::{
    AwsAuth, AwsJwtAuth, AwsProvider, AwsServiceType, ClusterSecretStore, ProviderSpec,
    SecretStore, SecretStoreSpec, ServiceAccountSelector,
};
use crate::naming::{mounted_irsa_store_name, referenced_irsa_store_name, StoreScope, StoreVariant};
use crate::provider::AuthStrategy;

/// Label recording which fixture variant created a store
pub const LABEL_STORE_VARIANT: &str = "eso-e2e.io/store-variant";

/// A store of either scope, ready to be created
#[derive(Clone, Debug, PartialEq)]
pub enum Store {
    /// Namespaced store
    Namespaced(SecretStore),
    /// Cluster-scoped store
    Cluster(ClusterSecretStore),
}

impl Store {
    /// Store name
    pub fn name(&self) -> &str {
        match self {
            Store::Namespaced(s) => &s.metadata.name,
            Store::Cluster(s) => &s.metadata.name,
        }
    }

    /// Store namespace, `None` at cluster scope
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Store::Namespaced(s) => Some(&s.metadata.namespace),
            Store::Cluster(_) => None,
        }
    }

    /// Provider configuration embedded in the store
    pub fn provider(&self) -> &ProviderSpec {
        match self {
            Store::Namespaced(s) => &s.spec.provider,
            Store::Cluster(s) => &s.spec.provider,
        }
    }

    /// Issue the create call matching the store's scope
    pub async fn create<C: ControlPlane + ?Sized>(&self, client: &C) -> Result<()> {
        match self {
            Store::Namespaced(s) => client.create_secret_store(s).await,
            Store::Cluster(s) => client.create_cluster_secret_store(s).await,
        }
    }
}

/// Build the store for `variant` in `namespace`.
///
/// The referent store is cluster-scoped: `namespace` only feeds its name, and
/// the credential Secret is resolved in whichever namespace consumes it.
pub fn build_store(
    variant: StoreVariant,
    namespace: &str,
    service: AwsServiceType,
    region: &str,
    strategy: &AuthStrategy,
) -> Store {
    let name = variant.store_name(namespace);
    let spec = SecretStoreSpec {
        provider: strategy.provider_spec(service, region, variant.credentials_secret_name()),
    };

    match variant.scope() {
        StoreScope::Namespaced => {
            let mut store = SecretStore::new(name, namespace, spec);
            store.metadata = store
                .metadata
                .with_label(LABEL_STORE_VARIANT, variant.to_string());
            Store::Namespaced(store)
        }
        StoreScope::Cluster => {
            let mut store = ClusterSecretStore::new(name, spec);
            store.metadata = store
                .metadata
                .with_label(LABEL_STORE_VARIANT, variant.to_string());
            Store::Cluster(store)
        }
    }
}

/// Build and create the store for `variant`. Exactly one create call.
pub async fn register_store<C: ControlPlane + ?Sized>(
    client: &C,
    variant: StoreVariant,
    namespace: &str,
    service: AwsServiceType,
    region: &str,
    strategy: &AuthStrategy,
) -> Result<Store> {
    let store = build_store(variant, namespace, service, region, strategy);
    store.create(client).await?;
    info!(
        variant = %variant,
        store = %store.name(),
        namespace = ?store.namespace(),
        "Registered secret store"
    );
    Ok(store)
}

fn irsa_provider(service: AwsServiceType, region: &str, auth: AwsAuth) -> ProviderSpec {
    ProviderSpec {
        aws: Some(AwsProvider {
            service,
            region: region.to_string(),
            role: None,
            external_id: None,
            session_tags: None,
            auth,
        }),
    }
}

/// ClusterSecretStore authenticating with the token of `service_account`
/// in `namespace`
pub fn build_referenced_irsa_store(
    namespace: &str,
    service: AwsServiceType,
    region: &str,
    service_account: &str,
) -> ClusterSecretStore {
    let auth = AwsAuth {
        secret_ref: None,
        jwt: Some(AwsJwtAuth {
            service_account_ref: ServiceAccountSelector {
                name: service_account.to_string(),
                namespace: Some(namespace.to_string()),
            },
        }),
    };
    ClusterSecretStore::new(
        referenced_irsa_store_name(namespace),
        SecretStoreSpec {
            provider: irsa_provider(service, region, auth),
        },
    )
}

/// SecretStore with no auth block; the controller's mounted identity is used
pub fn build_mounted_irsa_store(
    namespace: &str,
    service: AwsServiceType,
    region: &str,
) -> SecretStore {
    SecretStore::new(
        mounted_irsa_store_name(namespace),
        namespace,
        SecretStoreSpec {
            provider: irsa_provider(service, region, AwsAuth::default()),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockControlPlane;
    use eso_e2e_common::Error;
    use crate::eso::Tag;

    const ROLE: &str = "arn:aws:iam::783882199045:role/eso-e2e-external-id";

    fn aws(store: &Store) -> AwsProvider {
        store.provider().aws.clone().expect("aws provider")
    }

    #[test]
    fn static_store_is_namespaced_with_empty_role() {
        let store = build_store(
            StoreVariant::Static,
            "test-ns",
            AwsServiceType::SecretsManager,
            "us-east-1",
            &AuthStrategy::Static,
        );

        assert_eq!(store.name(), "aws-static-creds");
        assert_eq!(store.namespace(), Some("test-ns"));
        let aws = aws(&store);
        assert_eq!(aws.role, None);
        assert_eq!(aws.external_id, None);
        assert_eq!(aws.session_tags, None);
        assert_eq!(
            aws.auth.secret_ref.unwrap().access_key_id.name,
            "provider-secret"
        );
    }

    #[test]
    fn external_id_store_reads_its_own_credentials() {
        let strategy = AuthStrategy::external_id(ROLE, "eso-e2e-ext-id").unwrap();
        let store = build_store(
            StoreVariant::ExternalId,
            "test-ns",
            AwsServiceType::SecretsManager,
            "eu-west-1",
            &strategy,
        );
        assert_eq!(store.name(), "aws-ext-id");
        let aws = aws(&store);
        assert_eq!(aws.external_id.as_deref(), Some("eso-e2e-ext-id"));
        assert_eq!(
            aws.auth.secret_ref.unwrap().secret_access_key.name,
            "provider-secret-ext-id"
        );
    }

    #[test]
    fn session_tags_store_carries_tags() {
        let tags = vec![Tag::new("team", "eso")];
        let strategy = AuthStrategy::session_tags(ROLE, tags.clone()).unwrap();
        let store = build_store(
            StoreVariant::SessionTags,
            "test-ns",
            AwsServiceType::ParameterStore,
            "eu-west-1",
            &strategy,
        );
        assert_eq!(store.name(), "aws-sess-tags");
        let aws = aws(&store);
        assert_eq!(aws.session_tags, Some(tags));
        assert_eq!(aws.external_id, None);
        assert_eq!(aws.service, AwsServiceType::ParameterStore);
    }

    #[test]
    fn referent_store_is_cluster_scoped_with_namespace_suffix() {
        let store = build_store(
            StoreVariant::ReferentStatic,
            "ns1",
            AwsServiceType::SecretsManager,
            "us-east-1",
            &AuthStrategy::Static,
        );

        assert!(matches!(store, Store::Cluster(_)));
        assert_eq!(store.name(), "referent-authns1");
        assert_eq!(store.namespace(), None);
        let secret_ref = aws(&store).auth.secret_ref.unwrap();
        assert_eq!(secret_ref.access_key_id.name, "referent-provider-secret");
        // No namespace on the selector: resolved where the ExternalSecret lives.
        assert_eq!(secret_ref.access_key_id.namespace, None);
        assert_eq!(secret_ref.session_token.unwrap().namespace, None);
    }

    #[test]
    fn stores_are_labelled_with_their_variant() {
        let store = build_store(
            StoreVariant::ReferentStatic,
            "ns1",
            AwsServiceType::SecretsManager,
            "us-east-1",
            &AuthStrategy::Static,
        );
        let Store::Cluster(css) = store else {
            panic!("expected cluster store");
        };
        assert_eq!(
            css.metadata.labels.get(LABEL_STORE_VARIANT).map(String::as_str),
            Some("referent-static")
        );
    }

    #[test]
    fn referenced_irsa_store_uses_service_account_token() {
        let css = build_referenced_irsa_store(
            "e2e",
            AwsServiceType::SecretsManager,
            "eu-west-1",
            "eso-irsa",
        );
        assert_eq!(css.metadata.name, "irsa-ref-e2e");
        let aws = css.spec.provider.aws.unwrap();
        assert!(aws.auth.secret_ref.is_none());
        let sa = aws.auth.jwt.unwrap().service_account_ref;
        assert_eq!(sa.name, "eso-irsa");
        assert_eq!(sa.namespace.as_deref(), Some("e2e"));
    }

    #[test]
    fn mounted_irsa_store_has_no_auth() {
        let store = build_mounted_irsa_store("e2e", AwsServiceType::SecretsManager, "eu-west-1");
        assert_eq!(store.metadata.name, "irsa-mounted-e2e");
        assert_eq!(store.metadata.namespace, "e2e");
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["spec"]["provider"]["aws"]["auth"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn namespaced_variant_uses_secret_store_api() {
        let mut client = MockControlPlane::new();
        client
            .expect_create_secret_store()
            .withf(|s: &SecretStore| s.metadata.name == "aws-static-creds")
            .times(1)
            .returning(|_| Ok(()));
        client.expect_create_cluster_secret_store().never();

        register_store(
            &client,
            StoreVariant::Static,
            "test-ns",
            AwsServiceType::SecretsManager,
            "us-east-1",
            &AuthStrategy::Static,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn referent_variant_uses_cluster_secret_store_api() {
        let mut client = MockControlPlane::new();
        client.expect_create_secret_store().never();
        client
            .expect_create_cluster_secret_store()
            .withf(|s: &ClusterSecretStore| s.metadata.name == "referent-authns1")
            .times(1)
            .returning(|_| Ok(()));

        let store = register_store(
            &client,
            StoreVariant::ReferentStatic,
            "ns1",
            AwsServiceType::SecretsManager,
            "us-east-1",
            &AuthStrategy::Static,
        )
        .await
        .unwrap();
        assert_eq!(store.name(), "referent-authns1");
    }

    #[tokio::test]
    async fn store_create_failure_is_propagated() {
        let mut client = MockControlPlane::new();
        client
            .expect_create_secret_store()
            .times(1)
            .returning(|_| Err(Error::already_exists("SecretStore", "aws-ext-id", Some("ns"))));

        let strategy = AuthStrategy::external_id(ROLE, "x").unwrap();
        let err = register_store(
            &client,
            StoreVariant::ExternalId,
            "ns",
            AwsServiceType::SecretsManager,
            "us-east-1",
            &strategy,
        )
        .await
        .unwrap_err();
        assert!(err.is_already_exists());
    }
}

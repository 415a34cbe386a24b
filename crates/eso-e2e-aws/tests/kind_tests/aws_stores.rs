//! Integration tests for the AWS store fixtures
//!
//! Each story provisions one or more store variants in a fresh namespace and
//! reads the created objects back from the API server. Only the create path
//! is checked here; whether ESO can reach AWS with the credentials is left
//! to the suites consuming these fixtures.

use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;

use eso_e2e_aws::eso::{
    ClusterSecretStore, ExternalSecret, ExternalSecretData, ExternalSecretSpec,
    ExternalSecretTarget, RemoteRef, SecretStore, SecretStoreRef, Tag,
};
use eso_e2e_aws::naming::{
    IAM_ROLE_EXTERNAL_ID, IAM_ROLE_SESSION_TAGS, IAM_TRUSTED_EXTERNAL_ID,
    STATIC_CREDENTIALS_SECRET_NAME, STATIC_REFERENT_CREDENTIALS_SECRET_NAME, STATIC_STORE_NAME,
    WITH_MOUNTED_IRSA, WITH_REFERENCED_IRSA,
};
use eso_e2e_aws::{
    create_referent_static_store, setup_external_id_store, setup_mounted_irsa_store,
    setup_referenced_irsa_store, setup_session_tags_store, setup_static_store,
    use_mounted_irsa_store, AccessOpts, TestCase,
};

use super::helpers::{delete_cluster_store, get_dynamic, setup_test_env, try_get_dynamic};

/// Story: a suite author provisions the static credentials store
///
/// Expected behavior:
/// - The credential Secret holds exactly the three fixture fields
/// - The SecretStore references those fields and carries no role
#[tokio::test]
#[ignore = "requires a cluster with ESO CRDs and AWS credentials"]
async fn story_static_store_is_provisioned() {
    let env = setup_test_env("eso-static").await;
    let access = AccessOpts::from_env(&env.config.aws, "");

    setup_static_store(&env.framework, &access, env.service())
        .await
        .expect("static store setup");

    let secrets: Api<Secret> = Api::namespaced(env.client().clone(), &env.framework.namespace);
    let secret = secrets
        .get(STATIC_CREDENTIALS_SECRET_NAME)
        .await
        .expect("credential secret");
    let keys: Vec<_> = secret
        .data
        .unwrap_or_default()
        .into_keys()
        .collect();
    assert_eq!(keys, vec!["kid", "sak", "st"]);

    let store = get_dynamic::<SecretStore>(
        env.client(),
        Some(&env.framework.namespace),
        STATIC_STORE_NAME,
    )
    .await;
    let aws = &store.data["spec"]["provider"]["aws"];
    assert!(aws.get("role").is_none());
    assert_eq!(
        aws["auth"]["secretRef"]["accessKeyIDSecretRef"]["name"],
        STATIC_CREDENTIALS_SECRET_NAME
    );

    env.teardown().await;
}

/// Story: all credential-backed variants coexist in one namespace
///
/// Expected behavior:
/// - Every setup succeeds; names never collide within the namespace
/// - A second static setup is rejected because its names are taken
#[tokio::test]
#[ignore = "requires a cluster with ESO CRDs and AWS credentials"]
async fn story_all_variants_share_a_namespace() {
    let env = setup_test_env("eso-variants").await;
    let f = &env.framework;
    let service = env.service();

    // The default external-id role only trusts the suite's external id.
    if env.config.role_external_id == IAM_ROLE_EXTERNAL_ID {
        assert_eq!(env.config.external_id, IAM_TRUSTED_EXTERNAL_ID);
    }
    assert_ne!(IAM_ROLE_EXTERNAL_ID, IAM_ROLE_SESSION_TAGS);

    let static_access = AccessOpts::from_env(&env.config.aws, "");
    setup_static_store(f, &static_access, service)
        .await
        .expect("static store");

    let ext_access = static_access.clone().with_role(&env.config.role_external_id);
    setup_external_id_store(f, &ext_access, &env.config.external_id, service)
        .await
        .expect("external id store");

    let tags_access = static_access.clone().with_role(&env.config.role_session_tags);
    setup_session_tags_store(
        f,
        &tags_access,
        vec![Tag::new("namespace", f.namespace.clone())],
        service,
    )
    .await
    .expect("session tags store");

    let referent = create_referent_static_store(f, &static_access, service)
        .await
        .expect("referent store");

    let repeated = setup_static_store(f, &static_access, service).await;
    let css = try_get_dynamic::<ClusterSecretStore>(env.client(), None, referent.name()).await;

    // Cluster-scoped: namespace teardown would not remove it.
    delete_cluster_store::<ClusterSecretStore>(env.client(), referent.name()).await;
    env.teardown().await;

    let err = repeated.expect_err("names are already taken");
    assert!(err.is_already_exists());

    let css = css.expect("referent store exists");
    let selector = &css.data["spec"]["provider"]["aws"]["auth"]["secretRef"]["accessKeyIDSecretRef"];
    assert_eq!(selector["name"], STATIC_REFERENT_CREDENTIALS_SECRET_NAME);
    assert!(selector.get("namespace").is_none());
}

/// Story: an ExternalSecret is pointed at the mounted IRSA store and submitted
///
/// Expected behavior:
/// - The ExternalSecret is created with the namespace-derived store name
/// - The store reference can no longer be changed afterwards
#[tokio::test]
#[ignore = "requires a cluster with ESO CRDs and AWS credentials"]
async fn story_external_secret_uses_mounted_irsa_store() {
    let env = setup_test_env("eso-irsa").await;
    let f = &env.framework;

    setup_mounted_irsa_store(f, env.service(), &env.config.aws.region)
        .await
        .expect(WITH_MOUNTED_IRSA);

    let mut tc = TestCase::new(ExternalSecret::new(
        "irsa-es",
        f.namespace.clone(),
        ExternalSecretSpec {
            secret_store_ref: SecretStoreRef::secret_store(STATIC_STORE_NAME),
            target: ExternalSecretTarget::new("irsa-target"),
            data: vec![ExternalSecretData::new("value", RemoteRef::new("eso-e2e/irsa"))],
            refresh_interval: Some("10s".to_string()),
        },
    ));
    use_mounted_irsa_store(&mut tc).expect("pending case accepts a store");
    tc.submit(&f.client).await.expect("submit external secret");

    let es = get_dynamic::<ExternalSecret>(env.client(), Some(&f.namespace), "irsa-es").await;
    assert_eq!(
        es.data["spec"]["secretStoreRef"]["name"],
        format!("irsa-mounted-{}", f.namespace)
    );
    assert!(use_mounted_irsa_store(&mut tc).is_err());

    env.teardown().await;
}

/// Story: the referenced IRSA store exchanges a service-account token
///
/// Skipped unless ESO_E2E_IRSA_SERVICE_ACCOUNT names a service account bound
/// to an IAM role.
#[tokio::test]
#[ignore = "requires a cluster with ESO CRDs and AWS credentials"]
async fn story_referenced_irsa_store_is_cluster_scoped() {
    let env = setup_test_env("eso-irsa-ref").await;
    let Some(sa) = env.config.irsa_service_account.clone() else {
        println!("ESO_E2E_IRSA_SERVICE_ACCOUNT not set, skipping");
        env.teardown().await;
        return;
    };

    let store = setup_referenced_irsa_store(
        &env.framework,
        env.service(),
        &env.config.aws.region,
        &sa,
    )
    .await
    .expect(WITH_REFERENCED_IRSA);
    let css = try_get_dynamic::<ClusterSecretStore>(env.client(), None, store.name()).await;

    // Cluster-scoped: namespace teardown would not remove it.
    delete_cluster_store::<ClusterSecretStore>(env.client(), store.name()).await;
    let namespace = env.framework.namespace.clone();
    env.teardown().await;

    assert_eq!(store.namespace(), None);
    let css = css.expect("referenced irsa store exists");
    let sa_ref = &css.data["spec"]["provider"]["aws"]["auth"]["jwt"]["serviceAccountRef"];
    assert_eq!(sa_ref["name"], sa.as_str());
    assert_eq!(sa_ref["namespace"], namespace.as_str());
}

//! Credential Secrets holding static AWS access material
//!
//! Each store reads its keys from an Opaque Secret with three fixed keys.
//! The Secret is created once per fixture; it is never updated.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::info;

use eso_e2e_common::config::AwsEnv;
use eso_e2e_common::kube_utils::fixture_labels;
use eso_e2e_common::Result;

use crate::client::ControlPlane;

/// Secret key holding the access key id
pub const KEY_ID_FIELD: &str = "kid";
/// Secret key holding the secret access key
pub const SECRET_ACCESS_KEY_FIELD: &str = "sak";
/// Secret key holding the session token
pub const SESSION_TOKEN_FIELD: &str = "st";

/// Access material handed to a fixture
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessOpts {
    /// Access key id
    pub key_id: String,
    /// Secret access key
    pub secret_key: String,
    /// Session token, empty for long-lived keys
    pub session_token: String,
    /// AWS region
    pub region: String,
    /// Role to assume, empty for static credentials
    pub role: String,
}

impl AccessOpts {
    /// Access material from the environment, with the role to assume
    pub fn from_env(aws: &AwsEnv, role: impl Into<String>) -> Self {
        Self {
            key_id: aws.access_key_id.clone(),
            secret_key: aws.secret_access_key.clone(),
            session_token: aws.session_token.clone(),
            region: aws.region.clone(),
            role: role.into(),
        }
    }

    /// Same material, different role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

impl std::fmt::Debug for AccessOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessOpts")
            .field("key_id", &self.key_id)
            .field("secret_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("region", &self.region)
            .field("role", &self.role)
            .finish()
    }
}

/// Build the credential Secret `namespace/name` from `access`
pub fn build_credentials_secret(access: &AccessOpts, name: &str, namespace: &str) -> Secret {
    let mut string_data = BTreeMap::new();
    string_data.insert(KEY_ID_FIELD.to_string(), access.key_id.clone());
    string_data.insert(SECRET_ACCESS_KEY_FIELD.to_string(), access.secret_key.clone());
    string_data.insert(SESSION_TOKEN_FIELD.to_string(), access.session_token.clone());

    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(fixture_labels(name)),
            ..Default::default()
        },
        type_: Some("Opaque".to_string()),
        string_data: Some(string_data),
        ..Default::default()
    }
}

/// Create the credential Secret. Fails if the name is already taken.
pub async fn create_credentials<C: ControlPlane + ?Sized>(
    client: &C,
    access: &AccessOpts,
    name: &str,
    namespace: &str,
) -> Result<()> {
    let secret = build_credentials_secret(access, name, namespace);
    client.create_secret(&secret).await?;
    info!(namespace = %namespace, secret = %name, "Created provider credentials");
    Ok(())
}

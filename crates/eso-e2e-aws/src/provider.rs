//! AWS provider configuration for credential-backed stores
//!
//! The provider only stores references to the credential Secret (its name and
//! the three field keys), never the values. Rendering is total; the
//! role/external-id/session-tags combination is checked once, when an
//! [`AuthStrategy`] is constructed.

use eso_e2e_common::{Error, Result};

use crate::credentials::{KEY_ID_FIELD, SECRET_ACCESS_KEY_FIELD, SESSION_TOKEN_FIELD};
use crate::eso::{
    AwsAuth, AwsAuthSecretRef, AwsProvider, AwsServiceType, ProviderSpec, SecretKeySelector, Tag,
};

/// Build a provider block reading static keys from `secret_name`.
///
/// Empty `role`/`external_id` and empty or missing `session_tags` are left
/// out of the rendered object. No consistency checks are made.
pub fn new_static_store_provider(
    service: AwsServiceType,
    region: &str,
    secret_name: &str,
    role: &str,
    external_id: &str,
    session_tags: Option<Vec<Tag>>,
) -> ProviderSpec {
    ProviderSpec {
        aws: Some(AwsProvider {
            service,
            region: region.to_string(),
            role: non_empty(role),
            external_id: non_empty(external_id),
            session_tags: session_tags.filter(|tags| !tags.is_empty()),
            auth: AwsAuth {
                secret_ref: Some(credentials_secret_ref(secret_name)),
                jwt: None,
            },
        }),
    }
}

/// Selectors for the three credential fields of `secret_name`
pub fn credentials_secret_ref(secret_name: &str) -> AwsAuthSecretRef {
    AwsAuthSecretRef {
        access_key_id: SecretKeySelector::new(secret_name, KEY_ID_FIELD),
        secret_access_key: SecretKeySelector::new(secret_name, SECRET_ACCESS_KEY_FIELD),
        session_token: Some(SecretKeySelector::new(secret_name, SESSION_TOKEN_FIELD)),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// How a credential-backed store authenticates
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Use the static keys directly
    Static,
    /// Assume `role` with the static keys
    AssumedRole {
        /// Role ARN
        role: String,
    },
    /// Assume `role`, presenting an external id
    AssumedRoleExternalId {
        /// Role ARN
        role: String,
        /// External id the role's trust policy requires
        external_id: String,
    },
    /// Assume `role`, tagging the session
    AssumedRoleSessionTags {
        /// Role ARN
        role: String,
        /// Session tags, never empty
        session_tags: Vec<Tag>,
    },
}

impl AuthStrategy {
    /// Pick the strategy described by the inputs, rejecting contradictions.
    ///
    /// An empty tag list is the same as no tags.
    pub fn new(
        role: &str,
        external_id: &str,
        session_tags: Option<Vec<Tag>>,
    ) -> Result<Self> {
        let session_tags = session_tags.filter(|tags| !tags.is_empty());

        match (role.is_empty(), external_id.is_empty(), session_tags) {
            (true, true, None) => Ok(AuthStrategy::Static),
            (true, false, _) => Err(Error::validation(
                "external id given without a role to assume",
            )),
            (true, true, Some(_)) => Err(Error::validation(
                "session tags given without a role to assume",
            )),
            (false, false, Some(_)) => Err(Error::validation(format!(
                "role '{role}' given both an external id and session tags"
            ))),
            (false, true, None) => Ok(AuthStrategy::AssumedRole {
                role: role.to_string(),
            }),
            (false, false, None) => Ok(AuthStrategy::AssumedRoleExternalId {
                role: role.to_string(),
                external_id: external_id.to_string(),
            }),
            (false, true, Some(session_tags)) => Ok(AuthStrategy::AssumedRoleSessionTags {
                role: role.to_string(),
                session_tags,
            }),
        }
    }

    /// Assume `role` presenting `external_id`; both must be non-empty
    pub fn external_id(role: &str, external_id: &str) -> Result<Self> {
        if external_id.is_empty() {
            return Err(Error::validation("external id must not be empty"));
        }
        if role.is_empty() {
            return Err(Error::validation("external id given without a role to assume"));
        }
        Self::new(role, external_id, None)
    }

    /// Assume `role` with `session_tags`; both must be non-empty
    pub fn session_tags(role: &str, session_tags: Vec<Tag>) -> Result<Self> {
        if session_tags.is_empty() {
            return Err(Error::validation("session tags must not be empty"));
        }
        Self::new(role, "", Some(session_tags))
    }

    /// Role to assume, if any
    pub fn role(&self) -> Option<&str> {
        match self {
            AuthStrategy::Static => None,
            AuthStrategy::AssumedRole { role }
            | AuthStrategy::AssumedRoleExternalId { role, .. }
            | AuthStrategy::AssumedRoleSessionTags { role, .. } => Some(role),
        }
    }

    /// Render the provider block reading static keys from `secret_name`
    pub fn provider_spec(
        &self,
        service: AwsServiceType,
        region: &str,
        secret_name: &str,
    ) -> ProviderSpec {
        let (role, external_id, session_tags) = match self {
            AuthStrategy::Static => ("", "", None),
            AuthStrategy::AssumedRole { role } => (role.as_str(), "", None),
            AuthStrategy::AssumedRoleExternalId { role, external_id } => {
                (role.as_str(), external_id.as_str(), None)
            }
            AuthStrategy::AssumedRoleSessionTags { role, session_tags } => {
                (role.as_str(), "", Some(session_tags.clone()))
            }
        };
        new_static_store_provider(service, region, secret_name, role, external_id, session_tags)
    }
}

//! Environment configuration for fixture runs
//!
//! # Environment Variables
//!
//! ```bash
//! ESO_E2E_KUBECONFIG=/path/to/kubeconfig      # optional, inferred config otherwise
//! ESO_E2E_KUBE_CONTEXT=kind-eso-e2e           # optional
//! AWS_ACCESS_KEY_ID=...                       # required
//! AWS_SECRET_ACCESS_KEY=...                   # required
//! AWS_SESSION_TOKEN=...                       # optional
//! AWS_REGION=eu-west-1                        # optional
//! ESO_E2E_AWS_SERVICE=secretsmanager          # or parameterstore
//! ESO_E2E_ROLE_EXTERNAL_ID=arn:aws:iam::...   # optional override
//! ESO_E2E_ROLE_SESSION_TAGS=arn:aws:iam::...  # optional override
//! ESO_E2E_EXTERNAL_ID=eso-e2e-ext-id          # optional override
//! ESO_E2E_IRSA_SERVICE_ACCOUNT=my-sa          # optional
//! ESO_E2E_LOG_FORMAT=json                     # optional
//! ```

use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::debug;

use crate::telemetry::LogFormat;
use crate::{Error, Result};

/// Default AWS region when `AWS_REGION` is unset
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Default AWS service exercised by the fixtures
pub const DEFAULT_SERVICE: &str = "secretsmanager";

/// Service names accepted in `ESO_E2E_AWS_SERVICE`
pub const SUPPORTED_SERVICES: [&str; 2] = ["secretsmanager", "parameterstore"];

/// Role trusted only with the e2e external id
pub const DEFAULT_ROLE_EXTERNAL_ID: &str = "arn:aws:iam::783882199045:role/eso-e2e-external-id";

/// Role that accepts session tags
pub const DEFAULT_ROLE_SESSION_TAGS: &str = "arn:aws:iam::783882199045:role/eso-e2e-session-tags";

/// External id the external-id role trusts
pub const DEFAULT_EXTERNAL_ID: &str = "eso-e2e-ext-id";

/// Static AWS access material read from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct AwsEnv {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Session token (empty for long-lived keys)
    pub session_token: String,
    /// Region the provider talks to
    pub region: String,
}

impl std::fmt::Debug for AwsEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsEnv")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Fixture run configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct E2eConfig {
    /// Path to kubeconfig; `None` uses the inferred config
    pub kubeconfig: Option<String>,
    /// Kubeconfig context to select
    pub kube_context: Option<String>,
    /// AWS access material
    pub aws: AwsEnv,
    /// Service name, one of [`SUPPORTED_SERVICES`]
    pub service: String,
    /// Role assumed by the external-id fixture
    pub role_external_id: String,
    /// Role assumed by the session-tags fixture
    pub role_session_tags: String,
    /// External id presented when assuming `role_external_id`
    pub external_id: String,
    /// Service account bound to an IAM role, for the IRSA fixtures
    pub irsa_service_account: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
}

impl E2eConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            non_empty(key).ok_or_else(|| Error::config(format!("{key} must be set")))
        };

        Ok(Self {
            kubeconfig: non_empty("ESO_E2E_KUBECONFIG"),
            kube_context: non_empty("ESO_E2E_KUBE_CONTEXT"),
            aws: AwsEnv {
                access_key_id: required("AWS_ACCESS_KEY_ID")?,
                secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
                session_token: non_empty("AWS_SESSION_TOKEN").unwrap_or_default(),
                region: non_empty("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            },
            service: parse_service(non_empty("ESO_E2E_AWS_SERVICE"))?,
            role_external_id: non_empty("ESO_E2E_ROLE_EXTERNAL_ID")
                .unwrap_or_else(|| DEFAULT_ROLE_EXTERNAL_ID.to_string()),
            role_session_tags: non_empty("ESO_E2E_ROLE_SESSION_TAGS")
                .unwrap_or_else(|| DEFAULT_ROLE_SESSION_TAGS.to_string()),
            external_id: non_empty("ESO_E2E_EXTERNAL_ID")
                .unwrap_or_else(|| DEFAULT_EXTERNAL_ID.to_string()),
            irsa_service_account: non_empty("ESO_E2E_IRSA_SERVICE_ACCOUNT"),
            log_format: non_empty("ESO_E2E_LOG_FORMAT")
                .map(|f| LogFormat::from_name(&f))
                .unwrap_or_default(),
        })
    }

    /// Create a Kubernetes client for the configured cluster
    pub async fn create_client(&self) -> Result<Client> {
        crate::install_crypto_provider();

        let options = KubeConfigOptions {
            context: self.kube_context.clone(),
            ..Default::default()
        };

        let config = match &self.kubeconfig {
            Some(path) => {
                debug!(kubeconfig = %path, "Loading kubeconfig from file");
                let kubeconfig = kube::config::Kubeconfig::read_from(path).map_err(|e| {
                    Error::config(format!("failed to read kubeconfig {path}: {e}"))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| Error::config(format!("failed to load kubeconfig: {e}")))?
            }
            None if self.kube_context.is_some() => Config::from_kubeconfig(&options)
                .await
                .map_err(|e| Error::config(format!("failed to load kubeconfig: {e}")))?,
            None => Config::infer()
                .await
                .map_err(|e| Error::config(format!("failed to infer kube config: {e}")))?,
        };

        Ok(Client::try_from(config)?)
    }
}

fn parse_service(value: Option<String>) -> Result<String> {
    let Some(value) = value else {
        return Ok(DEFAULT_SERVICE.to_string());
    };
    let service = value.trim().to_lowercase();
    if SUPPORTED_SERVICES.contains(&service.as_str()) {
        Ok(service)
    } else {
        Err(Error::config(format!(
            "ESO_E2E_AWS_SERVICE must be secretsmanager or parameterstore, got '{value}'"
        )))
    }
}

//! Common types for the ESO e2e fixtures: errors, Kubernetes helpers,
//! logging and environment configuration

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod kube_utils;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Label key naming the resource
pub const LABEL_NAME: &str = "app.kubernetes.io/name";

/// Label key for the managing tool
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Label value marking resources created by the e2e fixtures
pub const LABEL_MANAGED_BY_E2E: &str = "eso-e2e";

/// Install the default rustls crypto provider.
///
/// kube's rustls transport needs a process-wide provider; repeated calls are
/// harmless.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

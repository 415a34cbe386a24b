//! Integration tests for the AWS store fixtures
//!
//! # Test Organization
//!
//! - `aws_stores`: Stories about provisioning each credential-backed store
//!   variant in a fresh namespace and reading the objects back
//!
//! # Environment Variables
//!
//! - AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY: required
//! - AWS_SESSION_TOKEN, AWS_REGION: optional
//! - ESO_E2E_KUBECONFIG, ESO_E2E_KUBE_CONTEXT: cluster selection
//! - ESO_E2E_IRSA_SERVICE_ACCOUNT: enables the referenced IRSA story

mod aws_stores;
mod helpers;

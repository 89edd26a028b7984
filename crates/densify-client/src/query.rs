//! Query describing what the caller wants from the API
//!
//! A query selects either one cloud system (account plus system name) or
//! one Kubernetes pod/container (cluster, namespace, controller type, pod
//! name, optional container name), and carries the fallback values used
//! when no live recommendation exists.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Controller types accepted for Kubernetes queries.
pub const CONTROLLER_TYPES: [&str; 7] = [
    "pod",
    "deployment",
    "replicaset",
    "daemonset",
    "statefulset",
    "cronjob",
    "job",
];

/// A validated, normalized description of what to pull from the API.
///
/// Exactly one selector mode is active, determined by `technology`:
/// Kubernetes fields for `k8s`/`kubernetes`, cloud fields otherwise.
/// Matchable fields are lowercased by [`ApiQuery::normalize`] before any
/// comparison; fallback values are passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiQuery {
    /// Analysis technology: aws, azure, gcp, k8s or kubernetes.
    pub technology: String,

    // Cloud selectors
    pub account_name: String,
    pub account_number: String,
    pub system_name: String,

    // Kubernetes selectors
    pub k8s_cluster: String,
    pub k8s_namespace: String,
    pub k8s_pod_name: String,
    /// Optional; when empty, every container in the pod is merged into one
    /// pod-level result.
    pub k8s_container_name: String,
    pub k8s_controller_type: String,

    /// Return a synthetic fallback recommendation instead of failing when
    /// nothing matches.
    pub skip_errors: bool,

    // Fallback values used when no recommendation exists yet
    pub fallback_instance: String,
    pub fallback_cpu_request: String,
    pub fallback_cpu_limit: String,
    pub fallback_mem_request: String,
    pub fallback_mem_limit: String,
}

impl ApiQuery {
    /// Lowercase every matchable field in place. Idempotent.
    pub fn normalize(&mut self) {
        self.technology = self.technology.to_lowercase();
        self.account_name = self.account_name.to_lowercase();
        self.account_number = self.account_number.to_lowercase();
        self.system_name = self.system_name.to_lowercase();
        self.k8s_cluster = self.k8s_cluster.to_lowercase();
        self.k8s_namespace = self.k8s_namespace.to_lowercase();
        self.k8s_pod_name = self.k8s_pod_name.to_lowercase();
        self.k8s_container_name = self.k8s_container_name.to_lowercase();
        self.k8s_controller_type = self.k8s_controller_type.to_lowercase();
    }

    /// True when the query targets containers rather than cloud systems.
    pub fn is_kubernetes(&self) -> bool {
        matches!(self.technology.as_str(), "k8s" | "kubernetes")
    }

    /// The analysis URI path for this query's technology. Total over the
    /// five recognized values; anything else is `InvalidTechnology`.
    pub fn analysis_path(&self) -> Result<&'static str, Error> {
        match self.technology.as_str() {
            "aws" => Ok("/analysis/cloud/aws"),
            "azure" => Ok("/analysis/cloud/azure"),
            "gcp" => Ok("/analysis/cloud/gcp"),
            "k8s" | "kubernetes" => Ok("/analysis/containers/kubernetes"),
            _ => Err(Error::InvalidTechnology),
        }
    }

    /// Pure check that the query has everything its selector mode needs.
    ///
    /// Called together with [`ApiQuery::normalize`] at configure time.
    pub fn validate(&self) -> Result<(), Error> {
        self.analysis_path()?;

        if self.is_kubernetes() {
            if self.k8s_cluster.is_empty()
                || self.k8s_namespace.is_empty()
                || self.k8s_controller_type.is_empty()
                || self.k8s_pod_name.is_empty()
            {
                return Err(Error::IncompleteKubernetesQuery);
            }
            if !self.has_valid_controller_type() {
                return Err(Error::InvalidControllerType);
            }
        } else {
            if self.system_name.is_empty() {
                return Err(Error::IncompleteCloudQuery);
            }
            if self.account_number.is_empty() && self.account_name.is_empty() {
                return Err(Error::IncompleteCloudQuery);
            }
        }
        Ok(())
    }

    fn has_valid_controller_type(&self) -> bool {
        let controller = self.k8s_controller_type.to_lowercase();
        controller.is_empty() || CONTROLLER_TYPES.contains(&controller.as_str())
    }
}

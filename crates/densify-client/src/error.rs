//! Error types for the Densify API client

use thiserror::Error;

/// Errors produced while configuring, resolving, aggregating or matching
/// recommendations.
///
/// Every operation fails fast: there are no retries anywhere in this
/// crate. Callers that set `skip_errors` on their query receive a
/// synthetic fallback recommendation instead of the resolution,
/// aggregation and match errors below.
#[derive(Debug, Error)]
pub enum Error {
    /// The instance URL, username or password was empty at connect time.
    #[error("instance URL, username and password cannot be empty")]
    MissingCredentials,

    /// The instance URL could not be parsed.
    #[error("invalid instance URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The authorize call was rejected by the instance.
    #[error("auth request received error status: {status}")]
    AuthFailed { status: u16 },

    /// Query technology is not one of the recognized values.
    #[error("invalid technology value provided; must be one of the following: aws, azure, gcp, kubernetes, k8s")]
    InvalidTechnology,

    /// A Kubernetes query is missing one of its required fields.
    #[error("query must have required kubernetes fields: cluster, namespace, controllerType, podName")]
    IncompleteKubernetesQuery,

    /// The controller type is not in the recognized set.
    #[error("query controller type must be one of: pod, deployment, replicaset, daemonset, statefulset, cronjob, job")]
    InvalidControllerType,

    /// A cloud query is missing the system name or both account selectors.
    #[error("query must have a system name and an account name or account number")]
    IncompleteCloudQuery,

    /// An operation that needs a query was called before `configure_query`.
    #[error("no query configured; call configure_query first")]
    NoConfiguredQuery,

    /// Aggregation was attempted before any analyses were resolved.
    #[error("no analyses resolved; call get_account_or_cluster first")]
    NoResolvedAnalyses,

    /// No analysis matched the account or cluster selector. Carries a
    /// deduplicated, newline-joined list of the available values for
    /// diagnostics.
    #[error("no account or cluster found with the name '{name}'. Existing names are:\n{available}")]
    NoMatchingAccountOrCluster { name: String, available: String },

    /// No cloud recommendation matched the system name.
    #[error("could not find a recommendation named: {0}")]
    SystemRecommendationNotFound(String),

    /// No container recommendation matched the Kubernetes selectors.
    #[error("could not find a recommendation for container ({container}) in namespace ({namespace}), controller ({controller_type}), pod ({pod_name})")]
    ContainerRecommendationNotFound {
        container: String,
        namespace: String,
        controller_type: String,
        pod_name: String,
    },

    /// The instance returned a non-success status for an API call.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The recommendation has no instance-governance data to bucket.
    #[error("no instance governance list available for instance: {0}")]
    GovernanceUnavailable(String),

    /// Transport-level failure from the HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body could not be decoded.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

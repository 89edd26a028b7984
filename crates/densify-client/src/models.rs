//! Wire models for the Densify optimization API

use serde::{Deserialize, Serialize};

/// One vendor-side optimization job/result set, scoped to a cloud account
/// or a Kubernetes cluster. Read-only: the resolver only filters these and
/// extracts identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analysis {
    pub account_id: String,
    pub account_name: String,
    pub analysis_id: String,
    pub analysis_name: String,
    pub href: String,
    pub analysis_status: String,
    pub analysis_results: String,
    pub policy_name: String,
    pub policy_instance_id: String,
}

/// One sizing recommendation for a cloud instance or a Kubernetes
/// container.
///
/// `analysis_type`, `analysis_technology`, the account context and
/// `approved_type` are not returned by the API; they are decorated onto
/// each record after retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendation {
    /// `cloud` or `containers`; set from the query at aggregation time.
    pub analysis_type: String,
    /// aws, azure, gcp, k8s or kubernetes; set from the query.
    pub analysis_technology: String,
    pub account_id: String,
    pub analysis_id: String,
    pub account_name: String,
    /// Resolved from `approval_type` at match time: `na` keeps the current
    /// type, `all`/`any` takes the recommended type, anything else is an
    /// explicit override.
    pub approved_type: String,

    // Cloud fields
    pub entity_id: String,
    pub resource_id: String,
    pub account_id_ref: String,
    pub region: String,
    pub current_type: String,
    pub recommendation_type: String,
    pub recommended_type: String,
    pub implementation_method: String,
    pub predicted_uptime: f64,
    pub total_hours_running: i64,
    pub total_hours: i64,
    pub name: String,
    pub rpt_href: String,
    pub approval_type: String,
    pub densify_policy: String,
    pub savings_estimate: f64,
    pub effort_estimate: String,
    pub power_state: String,
    pub recommended_host_entity_id: String,
    pub current_cost: f64,
    pub recommended_cost: f64,
    pub service_type: String,
    pub current_hourly_rate: f64,
    pub recommended_hourly_rate: f64,
    pub recomm_first_seen: i64,
    pub recomm_last_seen: i64,
    pub recomm_seen_count: i64,
    pub audit_info: AuditInfo,

    // Auto-scaling group fields
    pub min_group_current: String,
    pub min_group_recommended: String,
    pub max_group_current: String,
    pub max_group_recommended: String,
    pub current_desired_capacity: String,
    pub avg_instance_count_recommended: f64,
    pub avg_instance_count_current: f64,

    // Container fields
    pub container: String,
    pub cluster: String,
    pub host_name: String,
    pub estimated_savings: f64,
    pub total_net_savings: f64,
    pub display_name: String,
    pub pod_service: String,
    pub current_count: i64,
    pub current_cpu_request: i64,
    pub current_cpu_limit: i64,
    pub current_mem_request: i64,
    pub current_mem_limit: i64,
    pub recommended_cpu_request: i64,
    pub recommended_cpu_limit: i64,
    pub recommended_mem_request: i64,
    pub recommended_mem_limit: i64,
    pub running_hours: i64,
    pub controller_type: String,
    pub namespace: String,

    /// Per-container detail, populated only during pod-level aggregation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerRecommendation>,
    pub instance_governance: InstanceGovernance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditInfo {
    pub data_collection: AuditInfoDataCollection,
    #[serde(rename = "workloadDataLast30")]
    pub workload_data: AuditInfoWorkloadData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditInfoDataCollection {
    pub date_first_audited: i64,
    pub date_last_audited: i64,
    pub audit_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditInfoWorkloadData {
    pub first_date: i64,
    pub last_date: i64,
    pub total_days: i64,
    pub seen_days: i64,
}

/// One container inside a Kubernetes pod recommendation. Owned exclusively
/// by the parent [`Recommendation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerRecommendation {
    pub container: String,
    pub cluster: String,
    pub entity_id: String,
    pub estimated_savings: f64,
    pub total_net_savings: f64,
    pub display_name: String,
    pub pod_service: String,
    pub current_count: i64,
    pub current_cpu_request: i64,
    pub current_cpu_limit: i64,
    pub current_mem_request: i64,
    pub current_mem_limit: i64,
    pub recommended_cpu_request: i64,
    pub recommended_cpu_limit: i64,
    pub recommended_mem_request: i64,
    pub recommended_mem_limit: i64,
    pub fallback_cpu_request: String,
    pub fallback_cpu_limit: String,
    pub fallback_mem_request: String,
    pub fallback_mem_limit: String,
    pub running_hours: i64,
    pub controller_type: String,
    pub namespace: String,
    pub recommendation_type: String,
    pub approval_type: String,
    pub approved_type: String,
    #[serde(rename = "recommSeenCount")]
    pub days_reco_unchanged: i64,
}

/// Scored compatibility data for alternative instance types, fetched per
/// matched recommendation via the instance-governance scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceGovernance {
    pub current: GovernanceCurrent,
    pub optimal: GovernanceOptimal,
    pub targets: Vec<GovernanceTarget>,

    /// Populated by the API when the scope request failed.
    pub status: i64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GovernanceCurrent {
    pub entity_id: String,
    pub display_name: String,
    pub resource_id: String,
    pub resource_group: String,
    pub instance_type: String,
    pub blended_score: i64,
    #[serde(rename = "compatability")]
    pub compatibility: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GovernanceOptimal {
    pub instance_type: String,
    pub blended_score: i64,
    #[serde(rename = "compatability")]
    pub compatibility: String,
    pub recommendation_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceTarget {
    #[serde(rename = "instance_type")]
    pub instance_type: String,
    #[serde(rename = "blended_score")]
    pub blended_score: i64,
    /// `OK`, `Technically Incompatible`, `Insufficient Resources` or
    /// `Outside Spend Tolerance`.
    #[serde(rename = "compatability")]
    pub compatibility: String,
    #[serde(rename = "incompatibilityReason")]
    pub incompatibility_reason: Vec<String>,
    #[serde(rename = "percentOptimalCost")]
    pub percent_optimal_cost: f64,
}

impl Recommendation {
    /// Resolve the approval metadata into the type that should actually be
    /// applied: `na` means nothing is approved (keep the current type),
    /// `all`/`any` approves the recommendation, any other value is an
    /// explicit override type.
    pub fn approved_type_value(&self) -> String {
        match self.approval_type.as_str() {
            "na" => self.current_type.clone(),
            "all" | "any" => self.recommended_type.clone(),
            other => other.to_string(),
        }
    }

    /// Append the container-level subset of `reco` to this pod's
    /// containers collection.
    pub fn push_container(&mut self, reco: &Recommendation) {
        self.containers.push(ContainerRecommendation {
            container: reco.container.clone(),
            display_name: reco.display_name.clone(),
            cluster: reco.cluster.clone(),
            namespace: reco.namespace.clone(),
            pod_service: reco.pod_service.clone(),
            controller_type: reco.controller_type.clone(),
            entity_id: reco.entity_id.clone(),
            estimated_savings: reco.estimated_savings,
            total_net_savings: reco.total_net_savings,
            current_count: reco.current_count,
            current_cpu_request: reco.current_cpu_request,
            current_cpu_limit: reco.current_cpu_limit,
            current_mem_request: reco.current_mem_request,
            current_mem_limit: reco.current_mem_limit,
            recommended_cpu_request: reco.recommended_cpu_request,
            recommended_cpu_limit: reco.recommended_cpu_limit,
            recommended_mem_request: reco.recommended_mem_request,
            recommended_mem_limit: reco.recommended_mem_limit,
            running_hours: reco.running_hours,
            recommendation_type: reco.recommendation_type.clone(),
            approval_type: reco.approval_type.clone(),
            approved_type: reco.approved_type_value(),
            days_reco_unchanged: reco.recomm_seen_count,
            ..Default::default()
        });
    }

    /// True when the record identifies nothing at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.container.is_empty() && self.namespace.is_empty()
    }
}

//! Recommendation aggregation decoration and matching
//!
//! Aggregation flattens per-analysis recommendation lists into one
//! sequence, stamping each record with query-derived context. Matching
//! then reduces that sequence to the one logical result the caller asked
//! for: a single cloud system, a single container, or a pod-level merge of
//! every container in a pod. Both passes process the sequence in its given
//! order and never reorder it, so results are reproducible for identical
//! inputs.

use tracing::{debug, warn};

use crate::error::Error;
use crate::models::{ContainerRecommendation, Recommendation};
use crate::query::ApiQuery;

/// Sentinel recommendation type marking a client-side fallback record, as
/// opposed to a vendor recommendation.
pub const RECOMMENDATION_TYPE_FALLBACK: &str = "fallback";

/// Stamp freshly fetched records with the context the API does not return:
/// analysis type, technology and the query's account identifiers.
///
/// `approved_type` is initialized to the record's own recommended type
/// here; the approval metadata is resolved once, at match time, just
/// before a result is returned.
pub fn decorate(recos: &mut [Recommendation], query: &ApiQuery) {
    let analysis_type = if query.is_kubernetes() {
        "containers"
    } else {
        "cloud"
    };
    for reco in recos.iter_mut() {
        reco.analysis_type = analysis_type.to_string();
        reco.analysis_technology = query.technology.clone();
        reco.account_name = if query.is_kubernetes() {
            query.k8s_cluster.clone()
        } else {
            query.account_name.clone()
        };
        if !query.account_number.is_empty() {
            reco.account_id = query.account_number.clone();
        }
        reco.approved_type = reco.recommended_type.clone();
    }
}

/// Find the single recommendation matching the query, or the pod-level
/// merge of per-container records for Kubernetes queries without a
/// container name.
///
/// When nothing matches and the query opted into `skip_errors`, a
/// synthetic fallback record built from the query's fallback values is
/// returned instead of an error.
pub fn match_recommendation(
    query: &ApiQuery,
    recos: &[Recommendation],
) -> Result<Recommendation, Error> {
    if query.is_kubernetes() {
        match_container(query, recos)
    } else {
        match_system(query, recos)
    }
}

fn match_system(query: &ApiQuery, recos: &[Recommendation]) -> Result<Recommendation, Error> {
    for reco in recos {
        if reco.name.to_lowercase() == query.system_name {
            let mut matched = reco.clone();
            matched.approved_type = matched.approved_type_value();
            if matched.approved_type.is_empty() {
                matched.approved_type = query.fallback_instance.clone();
            }
            return Ok(matched);
        }
    }

    if query.skip_errors {
        warn!(system = %query.system_name, "no recommendation found; returning fallback");
        return Ok(fallback_recommendation(query));
    }
    Err(Error::SystemRecommendationNotFound(
        query.system_name.clone(),
    ))
}

fn match_container(query: &ApiQuery, recos: &[Recommendation]) -> Result<Recommendation, Error> {
    let mut pod: Option<Recommendation> = None;

    for reco in recos {
        if reco.namespace.to_lowercase() != query.k8s_namespace
            || reco.controller_type.to_lowercase() != query.k8s_controller_type
            || reco.pod_service.to_lowercase() != query.k8s_pod_name
        {
            continue;
        }

        if !query.k8s_container_name.is_empty() {
            // only the one named container qualifies
            if reco.container.to_lowercase() != query.k8s_container_name {
                continue;
            }
            let mut matched = reco.clone();
            matched.approved_type = matched.approved_type_value();
            let container_copy = matched.clone();
            matched.push_container(&container_copy);
            return Ok(matched);
        }

        // pod-level merge: the first qualifying record seeds the scalar
        // fields, every qualifying record is appended as a container
        let result = pod.get_or_insert_with(|| reco.clone());
        result.push_container(reco);
    }

    if let Some(mut pod) = pod {
        pod.approved_type = pod.approved_type_value();
        if pod.containers.len() > 1 {
            // the pod no longer identifies a single container
            pod.container.clear();
            pod.name.clear();
        }
        debug!(
            pod = %query.k8s_pod_name,
            containers = pod.containers.len(),
            "merged pod recommendation"
        );
        return Ok(pod);
    }

    if query.skip_errors {
        warn!(
            pod = %query.k8s_pod_name,
            namespace = %query.k8s_namespace,
            "no recommendation found; returning fallback"
        );
        return Ok(fallback_recommendation(query));
    }
    Err(Error::ContainerRecommendationNotFound {
        container: query.k8s_container_name.clone(),
        namespace: query.k8s_namespace.clone(),
        controller_type: query.k8s_controller_type.clone(),
        pod_name: query.k8s_pod_name.clone(),
    })
}

/// Build the degraded-success record returned when `skip_errors` is set
/// and no live recommendation exists. The recommended type is the query's
/// fallback instance and the single container carries the fallback
/// CPU/memory strings; the recommendation type marks the record as a
/// client-side fallback.
pub fn fallback_recommendation(query: &ApiQuery) -> Recommendation {
    let mut reco = Recommendation {
        analysis_technology: query.technology.clone(),
        recommendation_type: RECOMMENDATION_TYPE_FALLBACK.to_string(),
        recommended_type: query.fallback_instance.clone(),
        approved_type: query.fallback_instance.clone(),
        ..Default::default()
    };
    if query.is_kubernetes() {
        reco.analysis_type = "containers".to_string();
        reco.account_name = query.k8s_cluster.clone();
        reco.cluster = query.k8s_cluster.clone();
        reco.namespace = query.k8s_namespace.clone();
        reco.controller_type = query.k8s_controller_type.clone();
        reco.pod_service = query.k8s_pod_name.clone();
        reco.container = query.k8s_container_name.clone();
    } else {
        reco.analysis_type = "cloud".to_string();
        reco.account_name = query.account_name.clone();
        reco.account_id = query.account_number.clone();
        reco.name = query.system_name.clone();
    }
    reco.containers.push(ContainerRecommendation {
        container: query.k8s_container_name.clone(),
        cluster: query.k8s_cluster.clone(),
        namespace: query.k8s_namespace.clone(),
        pod_service: query.k8s_pod_name.clone(),
        controller_type: query.k8s_controller_type.clone(),
        recommendation_type: RECOMMENDATION_TYPE_FALLBACK.to_string(),
        fallback_cpu_request: query.fallback_cpu_request.clone(),
        fallback_cpu_limit: query.fallback_cpu_limit.clone(),
        fallback_mem_request: query.fallback_mem_request.clone(),
        fallback_mem_limit: query.fallback_mem_limit.clone(),
        ..Default::default()
    });
    reco
}

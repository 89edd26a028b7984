//! Terraform-style rendering of recommendations
//!
//! Purely presentational: serializes matched recommendations into the
//! block-structured variable snippet consumed by Terraform configurations.

use std::fmt::Write;

use crate::models::Recommendation;

const DEFAULT_VAR_NAME: &str = "densify_recommendations";

/// Render with the default variable name.
pub fn to_terraform(recommendations: &[Recommendation]) -> String {
    to_terraform_named(recommendations, DEFAULT_VAR_NAME)
}

/// Render one block per recommendation under the given variable name.
pub fn to_terraform_named(recommendations: &[Recommendation], var_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{var_name} = {{");

    for reco in recommendations {
        let key = if reco.name.is_empty() {
            &reco.container
        } else {
            &reco.name
        };
        let _ = writeln!(out, "  \"{key}\" {{");
        let _ = writeln!(out, "    analysisType=\"{}\"", reco.analysis_type);
        let _ = writeln!(
            out,
            "    analysisTechnology=\"{}\"",
            reco.analysis_technology
        );

        if reco.analysis_type == "containers" {
            let _ = writeln!(out, "    cluster=\"{}\"", reco.cluster);
            let _ = writeln!(out, "    container=\"{}\"", reco.container);
            let _ = writeln!(out, "    controllerType=\"{}\"", reco.controller_type);
            let _ = writeln!(out, "    namespace=\"{}\"", reco.namespace);
            let _ = writeln!(out, "    podService=\"{}\"", reco.pod_service);
            let _ = writeln!(out, "    displayName=\"{}\"", reco.display_name);
            let _ = writeln!(
                out,
                "    estimatedSavings=\"{:.6}\"",
                reco.estimated_savings
            );
            let _ = writeln!(
                out,
                "    totalNetSavings=\"{:.6}\"",
                reco.total_net_savings
            );
            let _ = writeln!(out, "    currentCount=\"{}\"", reco.current_count);
            let _ = writeln!(
                out,
                "    currentCpuRequest=\"{}\"",
                reco.current_cpu_request
            );
            let _ = writeln!(out, "    currentCpuLimit=\"{}\"", reco.current_cpu_limit);
            let _ = writeln!(
                out,
                "    currentMemRequest=\"{}\"",
                reco.current_mem_request
            );
            let _ = writeln!(out, "    currentMemLimit=\"{}\"", reco.current_mem_limit);
            let _ = writeln!(
                out,
                "    recommendedCpuRequest=\"{}\"",
                reco.recommended_cpu_request
            );
            let _ = writeln!(
                out,
                "    recommendedCpuLimit=\"{}\"",
                reco.recommended_cpu_limit
            );
            let _ = writeln!(
                out,
                "    recommendedMemRequest=\"{}\"",
                reco.recommended_mem_request
            );
            let _ = writeln!(
                out,
                "    recommendedMemLimit=\"{}\"",
                reco.recommended_mem_limit
            );
            let _ = writeln!(out, "    runningHours=\"{}\"", reco.running_hours);
        } else {
            let _ = writeln!(out, "    accountIdRef=\"{}\"", reco.account_id_ref);
            let _ = writeln!(out, "    region=\"{}\"", reco.region);
            let _ = writeln!(out, "    serviceType=\"{}\"", reco.service_type);
            let _ = writeln!(out, "    currentType=\"{}\"", reco.current_type);
            let _ = writeln!(
                out,
                "    recommendationType=\"{}\"",
                reco.recommendation_type
            );
            let _ = writeln!(out, "    recommendedType=\"{}\"", reco.recommended_type);
            let _ = writeln!(out, "    approvedType=\"{}\"", reco.approved_type);
            let _ = writeln!(out, "    approvalType=\"{}\"", reco.approval_type);
            let _ = writeln!(out, "    powerState=\"{}\"", reco.power_state);
            let _ = writeln!(
                out,
                "    predictedUptime=\"{:.6}\"",
                reco.predicted_uptime
            );
            let _ = writeln!(
                out,
                "    implementationMethod=\"{}\"",
                reco.implementation_method
            );
            let _ = writeln!(
                out,
                "    savingsEstimate=\"{:.6}\"",
                reco.savings_estimate
            );
            let _ = writeln!(out, "    effortEstimate=\"{}\"", reco.effort_estimate);
            let _ = writeln!(out, "    densifyPolicy=\"{}\"", reco.densify_policy);
        }
        let _ = writeln!(out, "  }}");
    }

    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_block_carries_sizing_fields() {
        let reco = Recommendation {
            analysis_type: "cloud".to_string(),
            analysis_technology: "aws".to_string(),
            name: "web-1".to_string(),
            region: "us-east-1".to_string(),
            current_type: "m5.2xlarge".to_string(),
            recommended_type: "m6i.large".to_string(),
            approved_type: "m6i.large".to_string(),
            savings_estimate: 123.5,
            ..Default::default()
        };

        let text = to_terraform(&[reco]);
        assert!(text.starts_with("densify_recommendations = {"));
        assert!(text.contains("  \"web-1\" {"));
        assert!(text.contains("    currentType=\"m5.2xlarge\""));
        assert!(text.contains("    recommendedType=\"m6i.large\""));
        assert!(text.contains("    savingsEstimate=\"123.500000\""));
        assert!(text.ends_with('}'));
    }

    #[test]
    fn container_block_uses_container_key_and_fields() {
        let reco = Recommendation {
            analysis_type: "containers".to_string(),
            analysis_technology: "k8s".to_string(),
            container: "app".to_string(),
            namespace: "ns1".to_string(),
            pod_service: "web".to_string(),
            recommended_cpu_request: 250,
            recommended_mem_limit: 512,
            ..Default::default()
        };

        let text = to_terraform_named(&[reco], "my_recos");
        assert!(text.starts_with("my_recos = {"));
        assert!(text.contains("  \"app\" {"));
        assert!(text.contains("    namespace=\"ns1\""));
        assert!(text.contains("    recommendedCpuRequest=\"250\""));
        assert!(text.contains("    recommendedMemLimit=\"512\""));
    }

    #[test]
    fn empty_input_renders_empty_map() {
        assert_eq!(to_terraform(&[]), "densify_recommendations = {\n}");
    }
}

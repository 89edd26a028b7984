//! Recommendation commands

use anyhow::Result;
use densify_client::{render, ApiQuery, Client, Recommendation};
use tabled::Tabled;

use crate::output::{
    color_approval, format_millicores, format_savings, print_success, print_warning, OutputFormat,
};

/// Row for cloud recommendations
#[derive(Tabled)]
struct SystemRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Current")]
    current_type: String,
    #[tabled(rename = "Recommended")]
    recommended_type: String,
    #[tabled(rename = "Approved")]
    approved_type: String,
    #[tabled(rename = "Approval")]
    approval: String,
    #[tabled(rename = "Est. Savings")]
    savings: String,
}

/// Row for container recommendations
#[derive(Tabled)]
struct ContainerRow {
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "CPU Req")]
    cpu_request: String,
    #[tabled(rename = "CPU Lim")]
    cpu_limit: String,
    #[tabled(rename = "Mem Req")]
    memory_request: String,
    #[tabled(rename = "Mem Lim")]
    memory_limit: String,
}

/// Pull the full aggregated recommendation list for the resolved account
/// or cluster.
pub async fn list_recommendations(
    client: &mut Client,
    query: ApiQuery,
    format: OutputFormat,
    var_name: &str,
) -> Result<()> {
    client.configure_query(query)?;
    client.get_account_or_cluster().await?;
    let recos = client.get_recommendations().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recos)?);
        }
        OutputFormat::Terraform => {
            println!("{}", render::to_terraform_named(&recos, var_name));
        }
        OutputFormat::Table => {
            print_recommendations_table(&recos);
            println!("\nTotal: {} recommendations", recos.len());
        }
    }

    Ok(())
}

/// Pull the one recommendation the query selects, optionally enriched
/// with instance-governance guardrails.
pub async fn get_recommendation(
    client: &mut Client,
    query: ApiQuery,
    spend_tolerance: Option<f64>,
    format: OutputFormat,
    var_name: &str,
) -> Result<()> {
    client.configure_query(query)?;
    client.get_account_or_cluster().await?;
    let mut reco = client.get_recommendation().await?;

    if let Some(tolerance) = spend_tolerance {
        client.load_guardrails(&mut reco, tolerance).await?;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reco)?);
        }
        OutputFormat::Terraform => {
            println!("{}", render::to_terraform_named(&[reco], var_name));
        }
        OutputFormat::Table => {
            print_recommendations_table(std::slice::from_ref(&reco));
            if spend_tolerance.is_some() {
                print_guardrails(&reco)?;
            }
        }
    }

    Ok(())
}

fn print_recommendations_table(recos: &[Recommendation]) {
    if recos.is_empty() {
        print_warning("No recommendations found");
        return;
    }

    if recos[0].analysis_type == "containers" {
        let rows: Vec<ContainerRow> = recos
            .iter()
            .flat_map(|reco| {
                // pod-level results carry their detail in `containers`
                if reco.containers.is_empty() {
                    vec![ContainerRow {
                        container: reco.container.clone(),
                        namespace: reco.namespace.clone(),
                        pod: reco.pod_service.clone(),
                        cpu_request: format_millicores(reco.recommended_cpu_request),
                        cpu_limit: format_millicores(reco.recommended_cpu_limit),
                        memory_request: reco.recommended_mem_request.to_string(),
                        memory_limit: reco.recommended_mem_limit.to_string(),
                    }]
                } else {
                    reco.containers
                        .iter()
                        .map(|c| ContainerRow {
                            container: c.container.clone(),
                            namespace: c.namespace.clone(),
                            pod: c.pod_service.clone(),
                            cpu_request: format_millicores(c.recommended_cpu_request),
                            cpu_limit: format_millicores(c.recommended_cpu_limit),
                            memory_request: c.recommended_mem_request.to_string(),
                            memory_limit: c.recommended_mem_limit.to_string(),
                        })
                        .collect()
                }
            })
            .collect();
        let table = tabled::Table::new(rows)
            .with(tabled::settings::Style::rounded())
            .to_string();
        println!("{}", table);
    } else {
        let rows: Vec<SystemRow> = recos
            .iter()
            .map(|reco| SystemRow {
                name: reco.name.clone(),
                region: reco.region.clone(),
                current_type: reco.current_type.clone(),
                recommended_type: reco.recommended_type.clone(),
                approved_type: reco.approved_type.clone(),
                approval: color_approval(&reco.approval_type),
                savings: format_savings(reco.savings_estimate),
            })
            .collect();
        let table = tabled::Table::new(rows)
            .with(tabled::settings::Style::rounded())
            .to_string();
        println!("{}", table);
    }
}

fn print_guardrails(reco: &Recommendation) -> Result<()> {
    let ok = reco.guardrails_ok()?;
    if ok.is_empty() {
        print_warning("No compatible guardrail targets");
        return Ok(());
    }

    print_success(&format!(
        "Compatible instance types (scores {}..{}):",
        ok.min_score().unwrap_or(0),
        ok.max_score().unwrap_or(0)
    ));
    for score in ok.sorted_scores().into_iter().rev() {
        if let Some(items) = ok.score_items(score) {
            for node in items.values() {
                println!(
                    "  {:>3}  {}  ({:.1}% of optimal cost)",
                    score, node.instance_type, node.percent_optimal_cost
                );
            }
        }
    }
    Ok(())
}

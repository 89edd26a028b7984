//! Analysis-listing command

use anyhow::Result;
use densify_client::{ApiQuery, Client};
use tabled::Tabled;

use crate::output::{print_warning, OutputFormat};

/// Row for the analyses table
#[derive(Tabled)]
struct AnalysisRow {
    #[tabled(rename = "Analysis ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Account ID")]
    account_id: String,
    #[tabled(rename = "Account")]
    account_name: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Resolve the query's account or cluster and print the matching analyses.
pub async fn list_analyses(
    client: &mut Client,
    query: ApiQuery,
    format: OutputFormat,
) -> Result<()> {
    client.configure_query(query)?;
    let analyses = client.get_account_or_cluster().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&analyses)?);
        }
        OutputFormat::Table | OutputFormat::Terraform => {
            if analyses.is_empty() {
                print_warning("No analyses found");
                return Ok(());
            }
            let rows: Vec<AnalysisRow> = analyses
                .iter()
                .map(|a| AnalysisRow {
                    id: a.analysis_id.clone(),
                    name: a.analysis_name.clone(),
                    account_id: a.account_id.clone(),
                    account_name: a.account_name.clone(),
                    status: a.analysis_status.clone(),
                })
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!("\nTotal: {} analyses", analyses.len());
        }
    }

    Ok(())
}

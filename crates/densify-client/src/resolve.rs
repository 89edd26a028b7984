//! Analysis resolver
//!
//! Maps a query's account or cluster selector onto the vendor's analysis
//! listing. One logical account or cluster can span multiple analyses, so
//! every match is kept, in listing order.

use tracing::debug;

use crate::error::Error;
use crate::models::Analysis;
use crate::query::ApiQuery;

/// A set-semantics collector of string values, used only to build the
/// diagnostic list carried by resolution errors. Duplicates are
/// suppressed; the output is for humans, never machine processing.
#[derive(Debug, Default)]
pub struct UniqueList {
    values: std::collections::BTreeSet<String>,
}

impl UniqueList {
    pub fn add(&mut self, value: &str) {
        self.values.insert(value.to_string());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Newline-separated rendering for error messages.
    pub fn csv_multiline(&self) -> String {
        self.values.iter().cloned().collect::<Vec<_>>().join(",\n")
    }
}

/// Select the analyses matching the query from one page of the vendor
/// listing.
///
/// Matching is case-insensitive substring containment, not equality:
/// - Kubernetes: analysis name contains the cluster name;
/// - cloud with an account number: account id contains the number;
/// - cloud otherwise: account name contains the queried account name.
///
/// Zero matches fail with the deduplicated list of available values for
/// the active selector mode.
pub fn resolve_analyses(query: &ApiQuery, analyses: &[Analysis]) -> Result<Vec<Analysis>, Error> {
    let mut matched = Vec::new();
    let mut available = UniqueList::default();
    let use_account_number = !query.is_kubernetes() && !query.account_number.is_empty();

    for analysis in analyses {
        if query.is_kubernetes() {
            available.add(&analysis.analysis_name);
            if analysis
                .analysis_name
                .to_lowercase()
                .contains(&query.k8s_cluster)
            {
                matched.push(analysis.clone());
            }
        } else if use_account_number {
            available.add(&analysis.account_id);
            if analysis
                .account_id
                .to_lowercase()
                .contains(&query.account_number)
            {
                matched.push(analysis.clone());
            }
        } else {
            available.add(&analysis.account_name);
            if analysis
                .account_name
                .to_lowercase()
                .contains(&query.account_name)
            {
                matched.push(analysis.clone());
            }
        }
    }

    if matched.is_empty() {
        let name = if query.is_kubernetes() {
            &query.k8s_cluster
        } else if use_account_number {
            &query.account_number
        } else {
            &query.account_name
        };
        return Err(Error::NoMatchingAccountOrCluster {
            name: name.clone(),
            available: available.csv_multiline(),
        });
    }

    debug!(
        matches = matched.len(),
        listed = analyses.len(),
        "resolved analyses"
    );
    Ok(matched)
}
